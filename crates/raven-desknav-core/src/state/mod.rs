mod navigator;
mod status;

pub use navigator::Navigator;
pub use status::{HistoryEntry, NavigatorStatus, SharedStatus, SlotEntry};
