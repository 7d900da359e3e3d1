mod engine;
mod history;

pub use engine::{NavigationEngine, DEFAULT_CONTINUATION_DELAY};
pub use history::History;
