use async_channel::Sender;
use hyprland::data::{Workspace, Workspaces};
use hyprland::dispatch::{Dispatch, DispatchType, WorkspaceIdentifierWithSpecial};
use hyprland::event_listener::EventListener;
use hyprland::keyword::Keyword;
use hyprland::shared::{HyprData, HyprDataActive, WorkspaceType};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::desktop::{DesktopId, DesktopSnapshot};
use crate::messages::{NavigatorCommand, NavigatorEvent};

/// Wake-ups from the Hyprland event listener
#[derive(Debug, Clone)]
enum Signal {
    /// A workspace became active, by name
    Activated(String),
    /// Workspaces were created or destroyed, re-query the set
    Refresh,
    /// Listener came back after a failure
    Reconnected,
}

/// Async service for Hyprland IPC communication
pub struct HyprlandService {
    event_tx: Sender<NavigatorEvent>,
    command_rx: mpsc::Receiver<NavigatorCommand>,
    persistent_desktops: u32,
    snapshot: Option<DesktopSnapshot>,
}

impl HyprlandService {
    pub fn new(
        event_tx: Sender<NavigatorEvent>,
        command_rx: mpsc::Receiver<NavigatorCommand>,
        persistent_desktops: u32,
    ) -> Self {
        Self {
            event_tx,
            command_rx,
            persistent_desktops,
            snapshot: None,
        }
    }

    /// Check if Hyprland is running by looking for its socket
    fn is_hyprland_running() -> bool {
        if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
            if let Ok(sig) = std::env::var("HYPRLAND_INSTANCE_SIGNATURE") {
                let socket_path = format!("{}/hypr/{}/.socket.sock", runtime_dir, sig);
                return std::path::Path::new(&socket_path).exists();
            }
        }
        false
    }

    /// Main run loop - syncs initial state, starts event listener, handles commands
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("Starting Hyprland service");

        // Wait for Hyprland to be running
        loop {
            if Self::is_hyprland_running() {
                match self.try_connect().await {
                    Ok(()) => break,
                    Err(e) => {
                        warn!("Failed to connect to Hyprland: {}, retrying in 2s", e);
                    }
                }
            } else {
                warn!("Hyprland not running, waiting...");
            }
            tokio::time::sleep(std::time::Duration::from_secs(2)).await;
        }

        // Spawn event listener in background
        let (signal_tx, mut signal_rx) = mpsc::unbounded_channel::<Signal>();
        let event_tx = self.event_tx.clone();
        let listener_handle = tokio::spawn(async move {
            loop {
                if let Err(e) = Self::run_event_listener(signal_tx.clone()).await {
                    error!("Event listener error: {}, reconnecting...", e);
                    let _ = event_tx.send(NavigatorEvent::HostDisconnected).await;
                    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
                    let _ = signal_tx.send(Signal::Reconnected);
                }
            }
        });

        loop {
            tokio::select! {
                Some(signal) = signal_rx.recv() => {
                    let result = match signal {
                        Signal::Activated(name) => self.activated(&name).await,
                        Signal::Refresh => self.refresh(false).await,
                        Signal::Reconnected => self.try_connect().await,
                    };
                    if let Err(e) = result {
                        warn!("Failed to query Hyprland workspaces: {}", e);
                    }
                }

                cmd = self.command_rx.recv() => {
                    let Some(cmd) = cmd else { break };
                    if let Err(e) = self.handle_command(cmd).await {
                        error!("Failed to execute command: {}", e);
                    }
                }
            }
        }

        listener_handle.abort();
        Ok(())
    }

    /// Sync the full desktop set and announce the connection
    async fn try_connect(&mut self) -> anyhow::Result<()> {
        debug!("Syncing workspaces from Hyprland");
        self.refresh(true).await?;

        let _ = self.event_tx.send(NavigatorEvent::HostConnected).await;
        info!("Connected to Hyprland IPC");

        Ok(())
    }

    /// Query workspaces and emit whatever changed since the last snapshot.
    /// `force` always emits the full desktop set.
    async fn refresh(&mut self, force: bool) -> anyhow::Result<()> {
        let workspaces = Workspaces::get_async().await?;
        let mut snapshot = DesktopSnapshot::from_workspaces(
            workspaces.into_iter().map(|ws| (ws.id, ws.name)),
            self.persistent_desktops,
        );

        // Activations arrive in order through `activated`; polling the active
        // workspace here could jump over ones still queued
        let tracked = self
            .snapshot
            .as_ref()
            .filter(|_| !force)
            .and_then(|previous| previous.active.clone())
            .filter(|id| snapshot.contains(id));
        match tracked {
            Some(id) => snapshot.active = Some(id),
            None => {
                let active = Workspace::get_active_async().await?;
                snapshot = snapshot.with_active(active.id);
            }
        }

        let event = snapshot.event_since(self.snapshot.as_ref(), force);
        if let Some(NavigatorEvent::DesktopsChanged { desktops, .. }) = &event {
            debug!("Desktop set now has {} desktops", desktops.len());
        }
        self.snapshot = Some(snapshot);

        if let Some(event) = event {
            let _ = self.event_tx.send(event).await;
        }
        Ok(())
    }

    /// One workspace change event: report exactly that transition
    async fn activated(&mut self, name: &str) -> anyhow::Result<()> {
        let known = self
            .snapshot
            .as_ref()
            .is_some_and(|snapshot| snapshot.identifier_for_name(name).is_some());
        if !known {
            debug!("Workspace {:?} is not in the snapshot, re-querying", name);
            self.refresh(false).await?;
        }

        let event = self.snapshot.as_mut().and_then(|snapshot| snapshot.activate(name));
        if let Some(event) = event {
            let _ = self.event_tx.send(event).await;
        }
        Ok(())
    }

    /// Run the event listener (blocks until error)
    async fn run_event_listener(tx: mpsc::UnboundedSender<Signal>) -> anyhow::Result<()> {
        let mut listener = EventListener::new();

        // Active workspace changed
        let tx1 = tx.clone();
        listener.add_workspace_change_handler(move |workspace| {
            if let WorkspaceType::Regular(name) = workspace {
                let _ = tx1.send(Signal::Activated(name));
            }
        });

        // Workspace created
        let tx2 = tx.clone();
        listener.add_workspace_added_handler(move |_| {
            let _ = tx2.send(Signal::Refresh);
        });

        // Workspace destroyed
        let tx3 = tx.clone();
        listener.add_workspace_destroy_handler(move |_| {
            let _ = tx3.send(Signal::Refresh);
        });

        debug!("Starting Hyprland event listener");
        listener.start_listener_async().await?;

        Ok(())
    }

    /// Handle a command from the navigator
    async fn handle_command(&mut self, cmd: NavigatorCommand) -> anyhow::Result<()> {
        match cmd {
            NavigatorCommand::SwitchDesktop(id) => {
                if !self.snapshot.as_ref().is_some_and(|s| s.contains(&id)) {
                    warn!("Not switching to desktop {}: it no longer exists", id);
                    return Ok(());
                }

                debug!("Switching to workspace: {}", id);
                Dispatch::call_async(DispatchType::Workspace(Self::workspace_identifier(&id)))
                    .await?;
            }

            NavigatorCommand::RegisterShortcut(binding) => {
                debug!("Binding {}: {}", binding.action, binding.bind_value());
                Keyword::set_async("bind", binding.bind_value()).await?;
            }

            NavigatorCommand::UnregisterShortcut(binding) => {
                debug!("Unbinding {}: {}", binding.action, binding.unbind_value());
                Keyword::set_async("unbind", binding.unbind_value()).await?;
            }

            NavigatorCommand::SetPersistentDesktops(count) => {
                if count != self.persistent_desktops {
                    info!("Persistent desktops: {} -> {}", self.persistent_desktops, count);
                    self.persistent_desktops = count;
                    self.refresh(false).await?;
                }
            }
        }

        Ok(())
    }

    /// Identifiers are minted from workspace ids by the snapshot
    fn workspace_identifier(id: &DesktopId) -> WorkspaceIdentifierWithSpecial<'_> {
        match id.as_str().parse::<i32>() {
            Ok(n) => WorkspaceIdentifierWithSpecial::Id(n),
            Err(_) => WorkspaceIdentifierWithSpecial::Name(id.as_str()),
        }
    }
}
