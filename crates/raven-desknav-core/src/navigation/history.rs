use smallvec::SmallVec;

use crate::desktop::DesktopId;

/// Visited desktops, least recently used first. Each desktop appears once.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: SmallVec<[DesktopId; 16]>,
}

impl History {
    /// History holding only the desktop active at startup
    pub fn starting_at(id: DesktopId) -> Self {
        let mut history = Self::default();
        history.entries.push(id);
        history
    }

    /// Move `id` to the most recent position, dropping any earlier occurrence
    pub fn record(&mut self, id: DesktopId) {
        self.entries.retain(|entry| *entry != id);
        self.entries.push(id);
    }

    pub fn get(&self, index: usize) -> Option<&DesktopId> {
        self.entries.get(index)
    }

    /// Most recently visited desktop
    pub fn last(&self) -> Option<&DesktopId> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DesktopId> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(history: &History) -> Vec<&str> {
        history.iter().map(DesktopId::as_str).collect()
    }

    #[test]
    fn test_record_appends() {
        let mut history = History::starting_at("a".into());
        history.record("b".into());
        history.record("c".into());

        assert_eq!(ids(&history), vec!["a", "b", "c"]);
        assert_eq!(history.last(), Some(&DesktopId::from("c")));
    }

    #[test]
    fn test_record_moves_existing_to_back() {
        let mut history = History::starting_at("a".into());
        history.record("b".into());
        history.record("c".into());
        history.record("a".into());

        assert_eq!(ids(&history), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_record_never_duplicates() {
        let mut history = History::default();
        for id in ["a", "b", "a", "a", "c", "b", "c", "a"] {
            history.record(id.into());

            let mut seen: Vec<&str> = ids(&history);
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), history.len());
        }
        assert_eq!(ids(&history), vec!["b", "c", "a"]);
    }
}
