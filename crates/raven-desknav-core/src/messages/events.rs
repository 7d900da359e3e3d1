use std::time::Instant;

use crate::config::NavigatorSettings;
use crate::desktop::{DesktopEntry, DesktopId};
use crate::shortcuts::ShortcutAction;

/// Events FROM async services TO the navigator
#[derive(Debug, Clone)]
pub enum NavigatorEvent {
    // =========== Compositor Events ===========

    /// The set of desktops changed; carries the full new set
    DesktopsChanged {
        desktops: Vec<DesktopEntry>,
        active: Option<DesktopId>,
    },

    /// A different desktop became active
    ActiveDesktopChanged {
        previous: Option<DesktopId>,
        new: DesktopId,
    },

    // =========== Connection Events ===========

    /// Connected (or reconnected) to the compositor
    HostConnected,

    /// Lost connection to the compositor
    HostDisconnected,

    // =========== Shortcut Events ===========

    /// A navigation shortcut was pressed at `at`
    Shortcut {
        action: ShortcutAction,
        at: Instant,
    },

    // =========== Configuration Events ===========

    /// Navigator settings were reloaded
    SettingsReloaded(NavigatorSettings),
}
