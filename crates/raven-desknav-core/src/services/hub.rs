use std::sync::Arc;
use parking_lot::RwLock;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::config::{ConfigPaths, NavigatorSettings};
use crate::messages::{NavigatorCommand, NavigatorEvent};
use crate::state::{NavigatorStatus, SharedStatus};
use super::{ConfigWatcher, HyprlandService, IpcServer};

/// Central hub for managing all async services
pub struct ServiceHub {
    /// Event receiver drained by the navigator task
    event_rx: async_channel::Receiver<NavigatorEvent>,
    /// Command sender handed to the navigator's host
    command_tx: mpsc::Sender<NavigatorCommand>,
    /// Latest navigator status, served over the control socket
    status: SharedStatus,
    /// Tokio runtime
    runtime: Arc<Runtime>,
}

impl ServiceHub {
    /// Create a new ServiceHub with its own tokio runtime
    pub fn new(paths: ConfigPaths, settings: &NavigatorSettings) -> anyhow::Result<Self> {
        let runtime = Runtime::new()?;
        let runtime = Arc::new(runtime);

        // Create communication channels
        let (event_tx, event_rx) = async_channel::bounded::<NavigatorEvent>(64);
        let (command_tx, command_rx) = mpsc::channel::<NavigatorCommand>(64);
        let status: SharedStatus = Arc::new(RwLock::new(NavigatorStatus::default()));

        // Claim the control socket first so a second daemon stops here,
        // before it binds shortcuts of its own
        let server = IpcServer::new(&paths, event_tx.clone(), status.clone());
        let listener = runtime.block_on(server.bind())?;

        // Spawn services
        let event_tx_hyprland = event_tx.clone();
        // Later changes arrive as NavigatorCommand::SetPersistentDesktops
        let persistent_desktops = settings.persistent_desktops();
        runtime.spawn(async move {
            let service = HyprlandService::new(event_tx_hyprland, command_rx, persistent_desktops);
            if let Err(e) = service.run().await {
                error!("Hyprland service error: {}", e);
            }
        });

        let event_tx_config = event_tx.clone();
        let paths_config = paths.clone();
        runtime.spawn(async move {
            let watcher = ConfigWatcher::new(paths_config, event_tx_config);
            if let Err(e) = watcher.run().await {
                error!("Config watcher error: {}", e);
            }
        });

        runtime.spawn(async move {
            if let Err(e) = server.serve(listener).await {
                error!("Control socket error: {}", e);
            }
        });

        info!("ServiceHub initialized with all services");

        Ok(Self {
            event_rx,
            command_tx,
            status,
            runtime,
        })
    }

    /// Get a clone of the event receiver
    pub fn event_receiver(&self) -> async_channel::Receiver<NavigatorEvent> {
        self.event_rx.clone()
    }

    /// Get a clone of the command sender
    pub fn command_sender(&self) -> mpsc::Sender<NavigatorCommand> {
        self.command_tx.clone()
    }

    /// Get the shared status handle
    pub fn status(&self) -> SharedStatus {
        self.status.clone()
    }

    /// Get a reference to the runtime
    pub fn runtime(&self) -> &Arc<Runtime> {
        &self.runtime
    }
}
