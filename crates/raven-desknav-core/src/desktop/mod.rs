mod index;
mod snapshot;

pub use index::{DesktopEntry, DesktopId, DesktopIndex, SlotNumber};
pub use snapshot::DesktopSnapshot;
