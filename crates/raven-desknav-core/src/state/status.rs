use compact_str::CompactString;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::desktop::{DesktopId, SlotNumber};

/// Status snapshot shared between the navigator task and the control socket
pub type SharedStatus = Arc<RwLock<NavigatorStatus>>;

/// Point-in-time view of the navigator, served by `status` requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigatorStatus {
    pub connected: bool,
    /// Least recently used first
    pub history: Vec<HistoryEntry>,
    /// History position of an open walk
    pub candidate: Option<usize>,
    pub slots: Vec<SlotEntry>,
    pub continuation_delay_ms: u64,
    pub registered_shortcuts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: DesktopId,
    pub slot: Option<SlotNumber>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotEntry {
    pub slot: SlotNumber,
    pub id: DesktopId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<CompactString>,
}
