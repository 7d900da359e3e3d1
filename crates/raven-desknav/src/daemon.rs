use tracing::{debug, info};

use raven_desknav_core::{ChannelHost, ConfigPaths, Navigator, NavigatorEvent, NavigatorSettings, ServiceHub};

use crate::logging::LogHandle;

/// Run the navigation daemon
pub fn run(paths: ConfigPaths, settings: NavigatorSettings, log: LogHandle) -> anyhow::Result<()> {
    info!("Initializing Raven desktop navigator");
    debug!("Settings file: {:?}, control socket: {:?}", paths.settings, paths.socket);

    // Create service hub (starts tokio runtime and services)
    let services = ServiceHub::new(paths, &settings)?;
    let event_rx = services.event_receiver();
    let status = services.status();

    let host = ChannelHost::new(services.command_sender());
    let mut navigator = Navigator::new(host, settings);
    *status.write() = navigator.status();

    // Events are applied one at a time, in arrival order
    services.runtime().block_on(async move {
        while let Ok(event) = event_rx.recv().await {
            if let NavigatorEvent::SettingsReloaded(settings) = &event {
                log.set_debug(settings.debug_logging());
            }

            navigator.host_mut().observe(&event);
            navigator.handle_event(&event);

            *status.write() = navigator.status();
        }
    });

    info!("Raven desktop navigator exiting");
    Ok(())
}
