use std::time::{Duration, Instant};
use tracing::debug;

use super::History;
use crate::desktop::{DesktopId, DesktopIndex, SlotNumber};

/// Default window in which a repeated "previous desktop" press keeps walking
pub const DEFAULT_CONTINUATION_DELAY: Duration = Duration::from_millis(500);

/// Visit history plus the state of an in-progress walk back through it.
///
/// The engine never talks to the host. Operations that want a desktop switch
/// return the target and the caller forwards it.
#[derive(Debug)]
pub struct NavigationEngine {
    history: History,
    /// History position currently being previewed by a walk
    candidate: Option<usize>,
    last_trigger: Option<Instant>,
    continuation_delay: Duration,
}

impl NavigationEngine {
    pub fn new(active: Option<DesktopId>, continuation_delay: Duration) -> Self {
        let mut engine = Self {
            history: History::default(),
            candidate: None,
            last_trigger: None,
            continuation_delay,
        };
        engine.reset(active);
        engine
    }

    /// Forget everything and start over from the active desktop
    pub fn reset(&mut self, active: Option<DesktopId>) {
        self.history = match active {
            Some(id) => History::starting_at(id),
            None => History::default(),
        };
        self.candidate = None;
        self.last_trigger = None;
    }

    pub fn set_continuation_delay(&mut self, delay: Duration) {
        self.continuation_delay = delay;
    }

    pub fn continuation_delay(&self) -> Duration {
        self.continuation_delay
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn candidate(&self) -> Option<usize> {
        self.candidate
    }

    pub fn is_walking(&self) -> bool {
        self.candidate.is_some()
    }

    /// The host reports `id` became the active desktop
    pub fn record_visit(&mut self, id: DesktopId) {
        if let Some(candidate) = self.candidate {
            if self.history.get(candidate) == Some(&id) {
                // Our own walk landed; the entry is committed on finalize
                debug!("record_visit: {} is the walk candidate, history untouched", id);
                return;
            }
        }

        self.finalize_walk();
        debug!("record_visit: {}", id);
        self.history.record(id);
    }

    /// Commit the previewed entry as most recent and close the walk
    fn finalize_walk(&mut self) {
        let Some(candidate) = self.candidate.take() else {
            return;
        };

        if let Some(id) = self.history.get(candidate).cloned() {
            debug!("finalize_walk: committing {}", id);
            self.history.record(id);
        }
    }

    /// Close any walk and preview the entry before the most recent one
    fn start_walk(&mut self) -> Option<DesktopId> {
        self.finalize_walk();

        if self.history.is_empty() {
            debug!("start_walk: history is empty");
            return None;
        }

        let candidate = self.history.len().saturating_sub(2);
        self.candidate = Some(candidate);
        self.history.get(candidate).cloned()
    }

    /// "Previous used desktop" pressed at `now`. Returns the desktop to switch to.
    pub fn on_previous_desktop_shortcut(&mut self, now: Instant) -> Option<DesktopId> {
        let continuing = self
            .last_trigger
            .is_some_and(|last| now.saturating_duration_since(last) < self.continuation_delay);
        self.last_trigger = Some(now);

        let target = match self.candidate {
            Some(candidate) if continuing => {
                let candidate = candidate.saturating_sub(1);
                self.candidate = Some(candidate);
                self.history.get(candidate).cloned()
            }
            _ => self.start_walk(),
        };

        debug!(
            "previous_desktop: continuing={} candidate={:?} target={:?}",
            continuing, self.candidate, target
        );
        target
    }

    /// "Go to desktop `slot` with toggle" pressed while `current` is active.
    /// Returns the desktop to switch to.
    pub fn on_toggle_desktop_shortcut(
        &mut self,
        slot: SlotNumber,
        current: Option<&DesktopId>,
        index: &DesktopIndex,
    ) -> Option<DesktopId> {
        let Some(target) = index.identifier_for_slot(slot) else {
            debug!("toggle_desktop: no desktop in slot {}", slot);
            return None;
        };

        self.finalize_walk();

        if current != Some(target) {
            debug!("toggle_desktop: slot {} -> {}", slot, target);
            return Some(target.clone());
        }

        // Already there: jump back once, without leaving a walk open
        self.last_trigger = None;
        let back = self.start_walk();
        self.finalize_walk();

        debug!("toggle_desktop: already on slot {}, back to {:?}", slot, back);
        back
    }
}

impl Default for NavigationEngine {
    fn default() -> Self {
        Self::new(None, DEFAULT_CONTINUATION_DELAY)
    }
}
