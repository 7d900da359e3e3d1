use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DesknavError {
    #[error("unknown request: {0:?}")]
    UnknownRequest(String),

    #[error("invalid slot number: {0:?} (slots start at 1)")]
    InvalidSlot(String),

    #[error("failed to read settings {path:?}: {source}")]
    ReadSettings {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings {path:?}: {source}")]
    ParseSettings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
