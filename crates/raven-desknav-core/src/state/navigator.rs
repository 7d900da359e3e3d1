use std::time::Instant;
use tracing::{debug, info};

use super::{HistoryEntry, NavigatorStatus, SlotEntry};
use crate::config::NavigatorSettings;
use crate::desktop::{DesktopId, DesktopIndex};
use crate::host::DesktopHost;
use crate::messages::NavigatorEvent;
use crate::navigation::NavigationEngine;
use crate::shortcuts::{shortcut_bindings, ShortcutAction, ShortcutBinding};

/// Desktop index, navigation engine and host wired together.
///
/// Owns all navigation state; every event is applied synchronously and to
/// completion, in the order the events arrive.
pub struct Navigator<H: DesktopHost> {
    host: H,
    index: DesktopIndex,
    engine: NavigationEngine,
    settings: NavigatorSettings,
    /// Bindings currently registered with the host
    registered: Vec<ShortcutBinding>,
    connected: bool,
}

impl<H: DesktopHost> Navigator<H> {
    pub fn new(host: H, settings: NavigatorSettings) -> Self {
        let mut navigator = Self {
            host,
            index: DesktopIndex::new(),
            engine: NavigationEngine::new(None, settings.continuation_delay()),
            settings,
            registered: Vec::new(),
            connected: false,
        };
        navigator.sync_desktops();
        navigator
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn index(&self) -> &DesktopIndex {
        &self.index
    }

    pub fn engine(&self) -> &NavigationEngine {
        &self.engine
    }

    pub fn settings(&self) -> &NavigatorSettings {
        &self.settings
    }

    pub fn registered_shortcuts(&self) -> &[ShortcutBinding] {
        &self.registered
    }

    /// Apply one event from the services
    pub fn handle_event(&mut self, event: &NavigatorEvent) {
        match event {
            NavigatorEvent::DesktopsChanged { .. } => self.desktops_changed(),
            NavigatorEvent::ActiveDesktopChanged { previous, new } => {
                self.active_desktop_changed(previous.as_ref(), new)
            }
            NavigatorEvent::HostConnected => self.host_connected(),
            NavigatorEvent::HostDisconnected => {
                info!("Compositor disconnected, shortcuts will be rebound on reconnect");
                self.connected = false;
            }
            NavigatorEvent::Shortcut { action, at } => self.shortcut(*action, *at),
            NavigatorEvent::SettingsReloaded(settings) => self.apply_settings(settings.clone()),
        }
    }

    /// Desktop set changed: rebuild slots, restart history, follow the shortcut count
    pub fn desktops_changed(&mut self) {
        self.sync_desktops();
        self.reconcile_shortcuts();
    }

    pub fn active_desktop_changed(&mut self, previous: Option<&DesktopId>, new: &DesktopId) {
        debug!(
            "active_desktop_changed: {:?} -> {} (slot {:?})",
            previous.map(DesktopId::as_str),
            new,
            self.index.slot_for_identifier(new)
        );
        self.engine.record_visit(new.clone());
    }

    pub fn shortcut(&mut self, action: ShortcutAction, at: Instant) {
        debug!("shortcut: {}", action);

        let target = match action {
            ShortcutAction::PreviousDesktop => self.engine.on_previous_desktop_shortcut(at),
            ShortcutAction::ToggleDesktop(slot) => {
                let current = self.host.current_active_identifier();
                self.engine
                    .on_toggle_desktop_shortcut(slot, current.as_ref(), &self.index)
            }
        };

        if let Some(target) = target {
            self.switch_to(&target);
        }
    }

    pub fn apply_settings(&mut self, settings: NavigatorSettings) {
        self.engine.set_continuation_delay(settings.continuation_delay());
        self.host.settings_changed(&settings);
        self.settings = settings;
        info!(
            "Settings applied, continuation delay {}ms",
            self.engine.continuation_delay().as_millis()
        );
        self.reconcile_shortcuts();
    }

    fn switch_to(&mut self, target: &DesktopId) {
        if self.host.current_active_identifier().as_ref() == Some(target) {
            debug!("switch_to: {} is already active", target);
            return;
        }

        debug!(
            "switch_to: {} (slot {:?})",
            target,
            self.index.slot_for_identifier(target)
        );
        self.host.request_switch(target);
    }

    fn sync_desktops(&mut self) {
        let desktops = self.host.current_desktop_list();
        let active = self.host.current_active_identifier();

        self.index.rebuild(&desktops);
        debug!(
            "sync_desktops: {} desktops, history restarts at {:?}",
            desktops.len(),
            active.as_ref().map(DesktopId::as_str)
        );
        self.engine.reset(active);
    }

    /// Bind every wanted shortcut from scratch. Unbinding first keeps a
    /// restarted daemon from stacking duplicate binds in a live compositor.
    fn host_connected(&mut self) {
        self.connected = true;

        let desired = shortcut_bindings(&self.settings, self.index.len());
        for stale in self.registered.iter().filter(|b| !desired.contains(b)) {
            self.host.unregister_shortcut(stale);
        }
        for binding in &desired {
            self.host.unregister_shortcut(binding);
            self.host.register_shortcut(binding);
        }

        info!("Registered {} navigation shortcuts", desired.len());
        self.registered = desired;
    }

    /// Register what is wanted but missing, unregister what is no longer wanted
    fn reconcile_shortcuts(&mut self) {
        if !self.connected {
            return;
        }

        let desired = shortcut_bindings(&self.settings, self.index.len());
        if desired == self.registered {
            return;
        }

        let mut removed = 0;
        for stale in self.registered.iter().filter(|b| !desired.contains(b)) {
            self.host.unregister_shortcut(stale);
            removed += 1;
        }

        let mut added = 0;
        for binding in desired.iter().filter(|b| !self.registered.contains(b)) {
            self.host.register_shortcut(binding);
            added += 1;
        }

        info!("Shortcuts updated: {} added, {} removed", added, removed);
        self.registered = desired;
    }

    pub fn status(&self) -> NavigatorStatus {
        let desktops = self.host.current_desktop_list();

        NavigatorStatus {
            connected: self.connected,
            history: self
                .engine
                .history()
                .iter()
                .map(|id| HistoryEntry {
                    id: id.clone(),
                    slot: self.index.slot_for_identifier(id),
                })
                .collect(),
            candidate: self.engine.candidate(),
            slots: self
                .index
                .iter()
                .map(|(slot, id)| SlotEntry {
                    slot,
                    id: id.clone(),
                    name: desktops
                        .iter()
                        .find(|desktop| &desktop.id == id)
                        .and_then(|desktop| desktop.display_name.clone()),
                })
                .collect(),
            continuation_delay_ms: self.engine.continuation_delay().as_millis() as u64,
            registered_shortcuts: self.registered.len(),
        }
    }
}
