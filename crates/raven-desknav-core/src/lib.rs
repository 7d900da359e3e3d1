pub mod config;
pub mod desktop;
pub mod error;
pub mod host;
pub mod messages;
pub mod navigation;
pub mod services;
pub mod shortcuts;
pub mod state;

pub use config::{ConfigPaths, NavigatorSettings};
pub use desktop::{DesktopEntry, DesktopId, DesktopIndex, DesktopSnapshot, SlotNumber};
pub use error::DesknavError;
pub use host::{ChannelHost, DesktopHost};
pub use messages::{NavigatorCommand, NavigatorEvent};
pub use navigation::{History, NavigationEngine, DEFAULT_CONTINUATION_DELAY};
pub use services::{ConfigWatcher, HyprlandService, IpcRequest, IpcServer, ServiceHub};
pub use shortcuts::{shortcut_bindings, ShortcutAction, ShortcutBinding};
pub use state::{Navigator, NavigatorStatus, SharedStatus};
