use crate::desktop::DesktopId;
use crate::shortcuts::ShortcutBinding;

/// Commands FROM the navigator TO the compositor service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigatorCommand {
    /// Make this desktop the active one
    SwitchDesktop(DesktopId),

    /// Bind a navigation shortcut
    RegisterShortcut(ShortcutBinding),

    /// Remove a previously bound navigation shortcut
    UnregisterShortcut(ShortcutBinding),

    /// Workspaces that always count as desktops, after a settings reload
    SetPersistentDesktops(u32),
}
