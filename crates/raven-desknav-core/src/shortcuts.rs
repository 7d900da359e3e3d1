use compact_str::{format_compact, CompactString};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::config::NavigatorSettings;
use crate::desktop::SlotNumber;
use crate::error::DesknavError;

/// What a navigation shortcut does when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    /// Walk back through desktop history
    PreviousDesktop,
    /// Go to the desktop in this slot, or back if already there
    ToggleDesktop(SlotNumber),
}

impl ShortcutAction {
    /// Human readable shortcut name
    pub fn name(&self) -> CompactString {
        match self {
            Self::PreviousDesktop => "Previous Used Desktop".into(),
            Self::ToggleDesktop(slot) => format_compact!("Switch to Desktop {} with Toggle", slot),
        }
    }

    /// Request line understood by the control socket
    pub fn ipc_command(&self) -> CompactString {
        match self {
            Self::PreviousDesktop => "previous".into(),
            Self::ToggleDesktop(slot) => format_compact!("toggle {}", slot),
        }
    }
}

impl fmt::Display for ShortcutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for ShortcutAction {
    type Err = DesknavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("previous" | "prev"), None, _) => Ok(Self::PreviousDesktop),
            (Some("toggle"), Some(slot), None) => match slot.parse::<SlotNumber>() {
                Ok(slot) if slot > 0 => Ok(Self::ToggleDesktop(slot)),
                _ => Err(DesknavError::InvalidSlot(slot.to_string())),
            },
            _ => Err(DesknavError::UnknownRequest(s.trim().to_string())),
        }
    }
}

/// A key combination bound in the compositor to one shortcut action
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortcutBinding {
    pub action: ShortcutAction,
    pub modifiers: CompactString,
    pub key: CompactString,
    /// Command the compositor runs on press
    pub exec: CompactString,
}

impl ShortcutBinding {
    /// Value for Hyprland's `bind` keyword
    pub fn bind_value(&self) -> String {
        format!("{}, {}, exec, {}", self.modifiers, self.key, self.exec)
    }

    /// Value for Hyprland's `unbind` keyword
    pub fn unbind_value(&self) -> String {
        format!("{}, {}", self.modifiers, self.key)
    }
}

/// Number of toggle shortcuts to offer for `desktop_count` desktops
pub fn toggle_shortcut_count(settings: &NavigatorSettings, desktop_count: usize) -> u32 {
    let floor = settings.toggle_shortcut_floor();
    if settings.dynamic_shortcuts() {
        floor.max(desktop_count as u32)
    } else {
        floor
    }
}

/// Default key for a toggle slot: 1..9,0 on the primary modifiers for slots
/// 1-10, the same digits on the extended modifiers for 11-20.
fn toggle_key(settings: &NavigatorSettings, slot: SlotNumber) -> Option<(CompactString, CompactString)> {
    let n = slot.checked_sub(1)?;
    let digit = format_compact!("{}", (n % 10 + 1) % 10);
    match n / 10 {
        0 => Some((settings.toggle_modifiers().into(), digit)),
        1 => Some((settings.toggle_modifiers_extended().into(), digit)),
        _ => None,
    }
}

/// Full set of bindings the navigator wants registered
pub fn shortcut_bindings(settings: &NavigatorSettings, desktop_count: usize) -> Vec<ShortcutBinding> {
    let ctl = settings.ctl_command();
    let exec = |action: ShortcutAction| format_compact!("{} {}", ctl, action.ipc_command());

    let mut bindings = vec![ShortcutBinding {
        action: ShortcutAction::PreviousDesktop,
        modifiers: settings.previous_modifiers().into(),
        key: settings.previous_key().into(),
        exec: exec(ShortcutAction::PreviousDesktop),
    }];

    for slot in 1..=toggle_shortcut_count(settings, desktop_count) {
        let action = ShortcutAction::ToggleDesktop(slot);
        match toggle_key(settings, slot) {
            Some((modifiers, key)) => bindings.push(ShortcutBinding {
                action,
                modifiers,
                key,
                exec: exec(action),
            }),
            None => debug!("no default key for \"{}\", reachable via control socket only", action),
        }
    }

    bindings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        assert_eq!("previous".parse::<ShortcutAction>().unwrap(), ShortcutAction::PreviousDesktop);
        assert_eq!(" toggle 7 ".parse::<ShortcutAction>().unwrap(), ShortcutAction::ToggleDesktop(7));
        assert!(matches!("toggle 0".parse::<ShortcutAction>(), Err(DesknavError::InvalidSlot(_))));
        assert!(matches!("toggle x".parse::<ShortcutAction>(), Err(DesknavError::InvalidSlot(_))));
        assert!(matches!("jump".parse::<ShortcutAction>(), Err(DesknavError::UnknownRequest(_))));
        assert!(matches!("toggle 1 2".parse::<ShortcutAction>(), Err(DesknavError::UnknownRequest(_))));
    }

    #[test]
    fn test_ipc_command_parses_back() {
        for action in [ShortcutAction::PreviousDesktop, ShortcutAction::ToggleDesktop(12)] {
            assert_eq!(action.ipc_command().parse::<ShortcutAction>().unwrap(), action);
        }
    }

    #[test]
    fn test_default_bindings() {
        let settings = NavigatorSettings::default();
        let bindings = shortcut_bindings(&settings, 4);

        // previous + 20 toggles
        assert_eq!(bindings.len(), 21);
        assert_eq!(bindings[0].bind_value(), "SUPER, Tab, exec, desknav-ctl previous");
        assert_eq!(bindings[1].bind_value(), "SUPER, 1, exec, desknav-ctl toggle 1");
        assert_eq!(bindings[10].unbind_value(), "SUPER, 0");
        assert_eq!(bindings[11].bind_value(), "SUPER ALT, 1, exec, desknav-ctl toggle 11");
        assert_eq!(bindings[20].action, ShortcutAction::ToggleDesktop(20));
    }

    #[test]
    fn test_toggle_count_follows_desktops() {
        let mut settings = NavigatorSettings::default();
        assert_eq!(toggle_shortcut_count(&settings, 3), 20);
        assert_eq!(toggle_shortcut_count(&settings, 24), 24);

        // Slots past 20 have no default key
        assert_eq!(shortcut_bindings(&settings, 24).len(), 21);

        settings.set_dynamic_shortcuts(false);
        assert_eq!(toggle_shortcut_count(&settings, 24), 20);

        settings.set_toggle_shortcut_floor(5);
        assert_eq!(shortcut_bindings(&settings, 2).len(), 6);
    }
}
