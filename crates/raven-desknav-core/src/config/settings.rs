use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::error::DesknavError;

const MIN_CONTINUATION_DELAY_MS: u64 = 100;
const MAX_CONTINUATION_DELAY_MS: u64 = 2000;

/// Navigator settings (desknav.json). Every field is optional; accessors
/// supply the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigatorSettings {
    // Navigation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation_delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_logging: Option<bool>,

    // Desktops
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_desktops: Option<u32>,

    // Shortcuts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggle_shortcut_floor: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_shortcuts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_modifiers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggle_modifiers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggle_modifiers_extended: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctl_command: Option<String>,
}

impl NavigatorSettings {
    /// Get the default settings path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("raven/desknav.json")
    }

    /// Load settings, falling back to defaults when the file is missing or broken
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => settings,
            Err(DesknavError::ReadSettings { .. }) => Self::default(),
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, DesknavError> {
        let data = std::fs::read(path).map_err(|source| DesknavError::ReadSettings {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&data).map_err(|source| DesknavError::ParseSettings {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let dir = path.parent().ok_or_else(|| anyhow::anyhow!("Invalid path"))?;
        std::fs::create_dir_all(dir)?;
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Continuation window, clamped to 100..=2000 ms
    pub fn continuation_delay(&self) -> Duration {
        let ms = self.continuation_delay_ms.unwrap_or(500);
        let clamped = ms.clamp(MIN_CONTINUATION_DELAY_MS, MAX_CONTINUATION_DELAY_MS);
        if clamped != ms {
            warn!("continuation_delay_ms {} out of range, using {}", ms, clamped);
        }
        Duration::from_millis(clamped)
    }

    pub fn debug_logging(&self) -> bool {
        self.debug_logging.unwrap_or(false)
    }

    /// Workspaces that always count as desktops even while Hyprland has them closed.
    /// A reload re-derives the desktop set, which restarts history.
    pub fn persistent_desktops(&self) -> u32 {
        self.persistent_desktops.unwrap_or(10)
    }

    /// Minimum number of toggle shortcuts registered
    pub fn toggle_shortcut_floor(&self) -> u32 {
        self.toggle_shortcut_floor.unwrap_or(20)
    }

    /// Grow the toggle shortcuts with the desktop count
    pub fn dynamic_shortcuts(&self) -> bool {
        self.dynamic_shortcuts.unwrap_or(true)
    }

    pub fn previous_modifiers(&self) -> &str {
        self.previous_modifiers.as_deref().unwrap_or("SUPER")
    }

    pub fn previous_key(&self) -> &str {
        self.previous_key.as_deref().unwrap_or("Tab")
    }

    /// Modifiers for slots 1-10
    pub fn toggle_modifiers(&self) -> &str {
        self.toggle_modifiers.as_deref().unwrap_or("SUPER")
    }

    /// Modifiers for slots 11-20
    pub fn toggle_modifiers_extended(&self) -> &str {
        self.toggle_modifiers_extended.as_deref().unwrap_or("SUPER ALT")
    }

    /// Command the compositor runs to reach the daemon
    pub fn ctl_command(&self) -> &str {
        self.ctl_command.as_deref().unwrap_or("desknav-ctl")
    }

    pub fn set_continuation_delay_ms(&mut self, val: u64) {
        self.continuation_delay_ms = Some(val);
    }

    pub fn set_debug_logging(&mut self, val: bool) {
        self.debug_logging = Some(val);
    }

    pub fn set_toggle_shortcut_floor(&mut self, val: u32) {
        self.toggle_shortcut_floor = Some(val);
    }

    pub fn set_dynamic_shortcuts(&mut self, val: bool) {
        self.dynamic_shortcuts = Some(val);
    }
}
