mod commands;
mod events;

pub use commands::NavigatorCommand;
pub use events::NavigatorEvent;
