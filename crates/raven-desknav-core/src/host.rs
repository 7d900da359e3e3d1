use tokio::sync::mpsc;
use tracing::warn;

use crate::config::NavigatorSettings;
use crate::desktop::{DesktopEntry, DesktopId};
use crate::messages::{NavigatorCommand, NavigatorEvent};
use crate::shortcuts::ShortcutBinding;

/// The desktop environment as seen by the navigator
pub trait DesktopHost {
    /// Current desktops in host order
    fn current_desktop_list(&self) -> Vec<DesktopEntry>;

    fn current_active_identifier(&self) -> Option<DesktopId>;

    /// Ask the host to activate `id`. Fire and forget: success shows up later
    /// as an active-desktop change.
    fn request_switch(&mut self, id: &DesktopId);

    fn register_shortcut(&mut self, binding: &ShortcutBinding);

    fn unregister_shortcut(&mut self, binding: &ShortcutBinding);

    /// Settings were reloaded; pick up whatever the host itself depends on
    fn settings_changed(&mut self, _settings: &NavigatorSettings) {}
}

/// Host backed by the async compositor service.
///
/// Desktop state is mirrored from the events the service emits; requests go
/// out as [`NavigatorCommand`]s.
pub struct ChannelHost {
    desktops: Vec<DesktopEntry>,
    active: Option<DesktopId>,
    command_tx: mpsc::Sender<NavigatorCommand>,
}

impl ChannelHost {
    pub fn new(command_tx: mpsc::Sender<NavigatorCommand>) -> Self {
        Self {
            desktops: Vec::new(),
            active: None,
            command_tx,
        }
    }

    /// Update the mirrored state from an event, before the navigator sees it
    pub fn observe(&mut self, event: &NavigatorEvent) {
        match event {
            NavigatorEvent::DesktopsChanged { desktops, active } => {
                self.desktops = desktops.clone();
                self.active = active.clone();
            }
            NavigatorEvent::ActiveDesktopChanged { new, .. } => {
                self.active = Some(new.clone());
            }
            _ => {}
        }
    }

    fn send(&self, cmd: NavigatorCommand) {
        if let Err(e) = self.command_tx.try_send(cmd) {
            warn!("Dropping compositor command: {}", e);
        }
    }
}

impl DesktopHost for ChannelHost {
    fn current_desktop_list(&self) -> Vec<DesktopEntry> {
        self.desktops.clone()
    }

    fn current_active_identifier(&self) -> Option<DesktopId> {
        self.active.clone()
    }

    fn request_switch(&mut self, id: &DesktopId) {
        self.send(NavigatorCommand::SwitchDesktop(id.clone()));
    }

    fn register_shortcut(&mut self, binding: &ShortcutBinding) {
        self.send(NavigatorCommand::RegisterShortcut(binding.clone()));
    }

    fn unregister_shortcut(&mut self, binding: &ShortcutBinding) {
        self.send(NavigatorCommand::UnregisterShortcut(binding.clone()));
    }

    fn settings_changed(&mut self, settings: &NavigatorSettings) {
        self.send(NavigatorCommand::SetPersistentDesktops(settings.persistent_desktops()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_host_mirrors_events_and_forwards_commands() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut host = ChannelHost::new(tx);

        host.observe(&NavigatorEvent::DesktopsChanged {
            desktops: vec![DesktopEntry::new("1"), DesktopEntry::new("2")],
            active: Some("1".into()),
        });
        host.observe(&NavigatorEvent::ActiveDesktopChanged {
            previous: Some("1".into()),
            new: "2".into(),
        });

        assert_eq!(host.current_desktop_list().len(), 2);
        assert_eq!(host.current_active_identifier(), Some(DesktopId::from("2")));

        host.request_switch(&"1".into());
        assert_eq!(rx.try_recv().unwrap(), NavigatorCommand::SwitchDesktop("1".into()));
    }

    #[test]
    fn test_channel_host_forwards_persistent_desktops() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut host = ChannelHost::new(tx);

        let mut settings = NavigatorSettings::default();
        settings.persistent_desktops = Some(4);
        host.settings_changed(&settings);

        assert_eq!(rx.try_recv().unwrap(), NavigatorCommand::SetPersistentDesktops(4));
    }
}
