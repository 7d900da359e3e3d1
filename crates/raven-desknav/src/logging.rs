use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Handle for switching the daemon's log level at runtime
#[derive(Clone)]
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
}

impl LogHandle {
    /// Raise our crates to debug (or drop them back to info) without a restart
    pub fn set_debug(&self, debug: bool) {
        match build_filter(debug) {
            Ok(filter) => {
                if let Err(e) = self.filter.reload(filter) {
                    tracing::warn!("Failed to change log level: {}", e);
                }
            }
            Err(e) => tracing::warn!("Invalid log filter: {}", e),
        }
    }
}

fn build_filter(debug: bool) -> anyhow::Result<EnvFilter> {
    let level = if debug { "debug" } else { "info" };
    Ok(EnvFilter::from_default_env()
        .add_directive(format!("raven_desknav={}", level).parse()?)
        .add_directive(format!("raven_desknav_core={}", level).parse()?)
        .add_directive("hyprland=warn".parse()?))
}

/// Initialize logging
pub fn init(debug: bool) -> anyhow::Result<LogHandle> {
    let (filter, handle) = reload::Layer::new(build_filter(debug)?);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    Ok(LogHandle { filter: handle })
}
