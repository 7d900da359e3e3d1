use compact_str::{format_compact, CompactString};

use super::{DesktopEntry, DesktopId, SlotNumber};
use crate::messages::NavigatorEvent;

/// Desktop set and active desktop as seen by the compositor at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopSnapshot {
    pub desktops: Vec<DesktopEntry>,
    pub active: Option<DesktopId>,
}

impl DesktopSnapshot {
    /// Build a snapshot from Hyprland workspaces given as `(id, name)` pairs.
    ///
    /// Workspaces `1..=persistent` are always part of the set, whether or not
    /// Hyprland currently has them alive, so the set does not churn as empty
    /// workspaces come and go. Special workspaces (id <= 0) are ignored.
    pub fn from_workspaces<I>(workspaces: I, persistent: u32) -> Self
    where
        I: IntoIterator<Item = (i32, String)>,
    {
        let mut named: Vec<(u32, CompactString)> = workspaces
            .into_iter()
            .filter_map(|(id, name)| u32::try_from(id).ok().filter(|id| *id > 0).map(|id| (id, name.into())))
            .collect();

        for id in 1..=persistent {
            if !named.iter().any(|(existing, _)| *existing == id) {
                named.push((id, format_compact!("{}", id)));
            }
        }

        named.sort_unstable_by_key(|(id, _)| *id);

        let desktops = named
            .into_iter()
            .map(|(id, name)| {
                DesktopEntry::new(DesktopId::new(format_compact!("{}", id)))
                    .with_slot(id as SlotNumber)
                    .with_name(name)
            })
            .collect();

        Self {
            desktops,
            active: None,
        }
    }

    /// Set the active desktop from a Hyprland workspace id
    pub fn with_active(mut self, workspace: i32) -> Self {
        self.active = Self::desktop_id(workspace);
        self
    }

    fn desktop_id(workspace: i32) -> Option<DesktopId> {
        u32::try_from(workspace)
            .ok()
            .filter(|id| *id > 0)
            .map(|id| DesktopId::new(format_compact!("{}", id)))
    }

    /// Whether both snapshots describe the same desktop set. Names are ignored,
    /// a rename does not invalidate slots or history.
    pub fn same_desktops(&self, other: &DesktopSnapshot) -> bool {
        self.desktops.len() == other.desktops.len()
            && self
                .desktops
                .iter()
                .zip(&other.desktops)
                .all(|(a, b)| a.id == b.id && a.slot_hint == b.slot_hint)
    }

    pub fn contains(&self, id: &DesktopId) -> bool {
        self.desktops.iter().any(|desktop| &desktop.id == id)
    }

    /// Desktop for a workspace name as reported by Hyprland events
    pub fn identifier_for_name(&self, name: &str) -> Option<&DesktopId> {
        self.desktops
            .iter()
            .find(|desktop| desktop.display_name.as_deref() == Some(name))
            .or_else(|| self.desktops.iter().find(|desktop| desktop.id.as_str() == name))
            .map(|desktop| &desktop.id)
    }

    /// Make the workspace named `name` active. Returns the change to report;
    /// `None` when the name is unknown or already active.
    pub fn activate(&mut self, name: &str) -> Option<NavigatorEvent> {
        let new = self.identifier_for_name(name)?.clone();
        if self.active.as_ref() == Some(&new) {
            return None;
        }

        let previous = self.active.replace(new.clone());
        Some(NavigatorEvent::ActiveDesktopChanged { previous, new })
    }

    /// What to tell the navigator about this snapshot, given the last one.
    ///
    /// A changed set (or `force`) sends the whole set; otherwise only a
    /// change of the active desktop is reported.
    pub fn event_since(&self, previous: Option<&DesktopSnapshot>, force: bool) -> Option<NavigatorEvent> {
        match previous {
            Some(previous) if !force && previous.same_desktops(self) => {
                let new = self.active.as_ref()?;
                (previous.active.as_ref() != Some(new)).then(|| NavigatorEvent::ActiveDesktopChanged {
                    previous: previous.active.clone(),
                    new: new.clone(),
                })
            }
            _ => Some(NavigatorEvent::DesktopsChanged {
                desktops: self.desktops.clone(),
                active: self.active.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(snapshot: &DesktopSnapshot) -> Vec<&str> {
        snapshot.desktops.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_persistent_workspaces_are_included() {
        let snapshot = DesktopSnapshot::from_workspaces(vec![(2, "web".to_string())], 4).with_active(2);

        assert_eq!(ids(&snapshot), vec!["1", "2", "3", "4"]);
        assert_eq!(snapshot.active, Some(DesktopId::from("2")));
        assert_eq!(snapshot.desktops[1].display_name.as_deref(), Some("web"));
        assert_eq!(snapshot.desktops[3].slot_hint, Some(4));
    }

    #[test]
    fn test_special_workspaces_are_skipped() {
        let snapshot = DesktopSnapshot::from_workspaces(
            vec![(-98, "special:minimized".to_string()), (7, "7".to_string())],
            2,
        )
        .with_active(-98);

        assert_eq!(ids(&snapshot), vec!["1", "2", "7"]);
        assert_eq!(snapshot.active, None);
    }

    #[test]
    fn test_same_desktops_ignores_names_and_active() {
        let a = DesktopSnapshot::from_workspaces(vec![(1, "one".to_string())], 3).with_active(1);
        let b = DesktopSnapshot::from_workspaces(vec![(1, "renamed".to_string())], 3).with_active(3);
        let c = DesktopSnapshot::from_workspaces(vec![(5, "5".to_string())], 3).with_active(1);

        assert!(a.same_desktops(&b));
        assert!(!a.same_desktops(&c));
        assert!(c.contains(&"5".into()));
        assert!(!a.contains(&"5".into()));
    }

    fn id(s: &str) -> DesktopId {
        DesktopId::from(s)
    }

    fn active_change(event: Option<NavigatorEvent>) -> Option<(Option<String>, String)> {
        match event {
            Some(NavigatorEvent::ActiveDesktopChanged { previous, new }) => {
                Some((previous.map(|id| id.to_string()), new.to_string()))
            }
            _ => None,
        }
    }

    #[test]
    fn test_event_since_same_set_new_active() {
        let before = DesktopSnapshot::from_workspaces(Vec::new(), 3).with_active(1);
        let after = DesktopSnapshot::from_workspaces(Vec::new(), 3).with_active(2);

        assert_eq!(
            active_change(after.event_since(Some(&before), false)),
            Some((Some("1".to_string()), "2".to_string()))
        );
    }

    #[test]
    fn test_event_since_same_set_same_active() {
        let before = DesktopSnapshot::from_workspaces(vec![(2, "two".to_string())], 3).with_active(2);
        let after = DesktopSnapshot::from_workspaces(vec![(2, "renamed".to_string())], 3).with_active(2);

        assert!(after.event_since(Some(&before), false).is_none());
    }

    #[test]
    fn test_event_since_changed_set() {
        let before = DesktopSnapshot::from_workspaces(Vec::new(), 3).with_active(1);
        let after = DesktopSnapshot::from_workspaces(vec![(12, "12".to_string())], 3).with_active(1);

        match after.event_since(Some(&before), false) {
            Some(NavigatorEvent::DesktopsChanged { desktops, active }) => {
                assert_eq!(desktops.len(), 4);
                assert_eq!(active, Some(id("1")));
            }
            other => panic!("expected DesktopsChanged, got {:?}", other),
        }
        assert!(matches!(
            after.event_since(None, false),
            Some(NavigatorEvent::DesktopsChanged { .. })
        ));
    }

    #[test]
    fn test_event_since_forced() {
        let before = DesktopSnapshot::from_workspaces(Vec::new(), 3).with_active(1);
        let after = DesktopSnapshot::from_workspaces(Vec::new(), 3).with_active(1);

        assert!(matches!(
            after.event_since(Some(&before), true),
            Some(NavigatorEvent::DesktopsChanged { .. })
        ));
    }

    #[test]
    fn test_each_activation_is_reported_in_order() {
        let mut snapshot =
            DesktopSnapshot::from_workspaces(vec![(2, "web".to_string())], 3).with_active(1);

        // Two quick switches, both delivered before anyone re-queries Hyprland
        let events: Vec<_> = ["web", "3"]
            .into_iter()
            .filter_map(|name| active_change(snapshot.activate(name)))
            .collect();

        assert_eq!(
            events,
            vec![
                (Some("1".to_string()), "2".to_string()),
                (Some("2".to_string()), "3".to_string()),
            ]
        );
        assert!(snapshot.activate("3").is_none());
        assert!(snapshot.activate("nope").is_none());
        assert_eq!(snapshot.active, Some(id("3")));
    }
}
