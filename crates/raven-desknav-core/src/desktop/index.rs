use ahash::AHashMap;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// 1-based number a desktop is addressed by from shortcuts
pub type SlotNumber = u32;

/// Opaque desktop token handed out by the host. Compared, hashed and
/// displayed, never ordered or taken apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DesktopId(CompactString);

impl DesktopId {
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DesktopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DesktopId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DesktopId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// One desktop as reported by the host, in host order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    pub id: DesktopId,
    /// Host-assigned number, if the host has one
    pub slot_hint: Option<SlotNumber>,
    pub display_name: Option<CompactString>,
}

impl DesktopEntry {
    pub fn new(id: impl Into<DesktopId>) -> Self {
        Self {
            id: id.into(),
            slot_hint: None,
            display_name: None,
        }
    }

    pub fn with_slot(mut self, slot: SlotNumber) -> Self {
        self.slot_hint = Some(slot);
        self
    }

    pub fn with_name(mut self, name: impl Into<CompactString>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Slot number <-> desktop identifier lookup, rebuilt from every host snapshot
#[derive(Debug, Default)]
pub struct DesktopIndex {
    by_slot: AHashMap<SlotNumber, DesktopId>,
    by_id: AHashMap<DesktopId, SlotNumber>,
}

impl DesktopIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both mappings with the given snapshot.
    ///
    /// A desktop takes its host hint when the hint is non-zero, otherwise its
    /// position in the list plus one. When two desktops claim the same slot the
    /// later one owns it.
    pub fn rebuild(&mut self, desktops: &[DesktopEntry]) {
        self.by_slot.clear();
        self.by_id.clear();

        for (position, desktop) in desktops.iter().enumerate() {
            let slot = desktop
                .slot_hint
                .filter(|hint| *hint > 0)
                .unwrap_or(position as SlotNumber + 1);

            if let Some(previous) = self.by_slot.insert(slot, desktop.id.clone()) {
                debug!(
                    "rebuild: slot {} reassigned from {} to {}",
                    slot, previous, desktop.id
                );
            }
            self.by_id.insert(desktop.id.clone(), slot);
        }

        debug!("rebuild: {} desktops indexed", self.by_slot.len());
    }

    pub fn identifier_for_slot(&self, slot: SlotNumber) -> Option<&DesktopId> {
        self.by_slot.get(&slot)
    }

    pub fn slot_for_identifier(&self, id: &DesktopId) -> Option<SlotNumber> {
        self.by_id.get(id).copied()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.by_slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slot.is_empty()
    }

    /// Occupied slots in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (SlotNumber, &DesktopId)> {
        let mut slots: Vec<_> = self.by_slot.iter().map(|(slot, id)| (*slot, id)).collect();
        slots.sort_unstable_by_key(|(slot, _)| *slot);
        slots.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuild_by_position() {
        let mut index = DesktopIndex::new();
        index.rebuild(&[
            DesktopEntry::new("a"),
            DesktopEntry::new("b"),
            DesktopEntry::new("c"),
        ]);

        assert_eq!(index.len(), 3);
        assert_eq!(index.identifier_for_slot(1), Some(&DesktopId::from("a")));
        assert_eq!(index.identifier_for_slot(3), Some(&DesktopId::from("c")));
        assert_eq!(index.slot_for_identifier(&"b".into()), Some(2));
        assert_eq!(index.identifier_for_slot(4), None);
    }

    #[test]
    fn test_rebuild_fills_gaps_between_hints() {
        let mut index = DesktopIndex::new();
        index.rebuild(&[
            DesktopEntry::new("a").with_slot(1),
            DesktopEntry::new("b"),
            DesktopEntry::new("c").with_slot(3),
            DesktopEntry::new("d"),
        ]);

        let slots: Vec<_> = index.iter().map(|(slot, id)| (slot, id.as_str())).collect();
        assert_eq!(slots, vec![(1, "a"), (2, "b"), (3, "c"), (4, "d")]);
    }

    #[test]
    fn test_zero_hint_falls_back_to_position() {
        let mut index = DesktopIndex::new();
        index.rebuild(&[DesktopEntry::new("a"), DesktopEntry::new("b").with_slot(0)]);

        assert_eq!(index.slot_for_identifier(&"b".into()), Some(2));
    }

    #[test]
    fn test_duplicate_hint_last_write_wins() {
        let mut index = DesktopIndex::new();
        index.rebuild(&[
            DesktopEntry::new("a").with_slot(2),
            DesktopEntry::new("b").with_slot(2),
        ]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.identifier_for_slot(2), Some(&DesktopId::from("b")));
        // The losing desktop still remembers the slot it asked for
        assert_eq!(index.slot_for_identifier(&"a".into()), Some(2));
    }

    #[test]
    fn test_rebuild_clears_previous_mapping() {
        let mut index = DesktopIndex::new();
        index.rebuild(&[DesktopEntry::new("a"), DesktopEntry::new("b")]);
        index.rebuild(&[DesktopEntry::new("c")]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.identifier_for_slot(2), None);
        assert_eq!(index.slot_for_identifier(&"a".into()), None);

        index.rebuild(&[]);
        assert!(index.is_empty());
    }
}
