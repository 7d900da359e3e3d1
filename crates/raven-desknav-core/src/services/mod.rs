mod config_watcher;
mod hub;
mod hyprland;
mod ipc;

pub use config_watcher::ConfigWatcher;
pub use hub::ServiceHub;
pub use self::hyprland::HyprlandService;
pub use ipc::{IpcRequest, IpcServer};
