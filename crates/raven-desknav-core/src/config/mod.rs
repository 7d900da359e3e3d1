mod paths;
mod settings;

pub use paths::ConfigPaths;
pub use settings::NavigatorSettings;
