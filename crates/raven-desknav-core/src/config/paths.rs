use std::path::PathBuf;

use super::NavigatorSettings;

/// Filesystem locations used by the navigator
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub settings: PathBuf,
    pub socket: PathBuf,
}

impl ConfigPaths {
    pub fn new() -> Self {
        let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());

        Self {
            settings: NavigatorSettings::default_path(),
            socket: PathBuf::from(runtime_dir).join("raven-desknav.sock"),
        }
    }

    /// Get the directory holding the settings file
    pub fn settings_dir(&self) -> PathBuf {
        self.settings
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::new()
    }
}
