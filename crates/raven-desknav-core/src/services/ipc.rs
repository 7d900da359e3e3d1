use async_channel::Sender;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, info, warn};

use crate::config::{ConfigPaths, NavigatorSettings};
use crate::error::DesknavError;
use crate::messages::NavigatorEvent;
use crate::shortcuts::ShortcutAction;
use crate::state::SharedStatus;

const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// One line sent to the control socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpcRequest {
    Shortcut(ShortcutAction),
    Status,
    ReloadConfig,
}

impl FromStr for IpcRequest {
    type Err = DesknavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "status" => Ok(Self::Status),
            "reload-config" => Ok(Self::ReloadConfig),
            other => other.parse().map(Self::Shortcut),
        }
    }
}

/// Control socket that turns shortcut presses into navigator events.
///
/// Connections are served one at a time so presses reach the navigator in
/// the order they were made.
pub struct IpcServer {
    socket: PathBuf,
    settings: PathBuf,
    event_tx: Sender<NavigatorEvent>,
    status: SharedStatus,
}

impl IpcServer {
    pub fn new(paths: &ConfigPaths, event_tx: Sender<NavigatorEvent>, status: SharedStatus) -> Self {
        Self {
            socket: paths.socket.clone(),
            settings: paths.settings.clone(),
            event_tx,
            status,
        }
    }

    /// Bind the control socket. Fails if another navigator is still
    /// answering on it; a socket file nobody listens on is replaced.
    pub async fn bind(&self) -> anyhow::Result<UnixListener> {
        if self.socket.exists() {
            if UnixStream::connect(&self.socket).await.is_ok() {
                anyhow::bail!("another navigator is already running on {:?}", self.socket);
            }
            debug!("Removing stale control socket {:?}", self.socket);
            tokio::fs::remove_file(&self.socket).await?;
        }

        let listener = UnixListener::bind(&self.socket)?;
        info!("Control socket listening at {:?}", self.socket);
        Ok(listener)
    }

    /// Serve requests on a bound socket (blocks forever)
    pub async fn serve(self, listener: UnixListener) -> anyhow::Result<()> {
        loop {
            let (stream, _) = listener.accept().await?;
            if let Err(e) = self.handle_client(stream).await {
                warn!("Control socket client error: {}", e);
            }
        }
    }

    /// Bind and serve
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    async fn handle_client(&self, stream: UnixStream) -> anyhow::Result<()> {
        let (reader, mut writer) = stream.into_split();

        let mut line = String::new();
        tokio::time::timeout(READ_TIMEOUT, BufReader::new(reader).read_line(&mut line)).await??;

        // Sampled on arrival, this is the press time the continuation check uses
        let received = Instant::now();
        debug!("Control request: {:?}", line.trim());

        let response = match line.parse::<IpcRequest>() {
            Ok(request) => self.respond(request, received).await?,
            Err(e) => format!("error: {}", e),
        };

        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.shutdown().await?;

        Ok(())
    }

    async fn respond(&self, request: IpcRequest, received: Instant) -> anyhow::Result<String> {
        match request {
            IpcRequest::Shortcut(action) => {
                self.send(NavigatorEvent::Shortcut { action, at: received }).await?;
                Ok("ok".to_string())
            }
            IpcRequest::Status => {
                let body = serde_json::to_string_pretty(&*self.status.read())?;
                Ok(body)
            }
            IpcRequest::ReloadConfig => match Self::load_settings(&self.settings) {
                Ok(settings) => {
                    self.send(NavigatorEvent::SettingsReloaded(settings)).await?;
                    Ok("ok".to_string())
                }
                Err(e) => Ok(format!("error: {}", e)),
            },
        }
    }

    fn load_settings(path: &Path) -> Result<NavigatorSettings, DesknavError> {
        match NavigatorSettings::try_load(path) {
            // No file means defaults
            Err(DesknavError::ReadSettings { .. }) if !path.exists() => Ok(NavigatorSettings::default()),
            other => other,
        }
    }

    async fn send(&self, event: NavigatorEvent) -> anyhow::Result<()> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| anyhow::anyhow!("navigator is not running"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NavigatorStatus;
    use parking_lot::RwLock;
    use std::sync::Arc;
    use tokio::io::AsyncReadExt;

    #[test]
    fn test_parse_requests() {
        assert_eq!("status\n".parse::<IpcRequest>().unwrap(), IpcRequest::Status);
        assert_eq!("reload-config".parse::<IpcRequest>().unwrap(), IpcRequest::ReloadConfig);
        assert_eq!(
            "toggle 3\n".parse::<IpcRequest>().unwrap(),
            IpcRequest::Shortcut(ShortcutAction::ToggleDesktop(3))
        );
        assert!("restart".parse::<IpcRequest>().is_err());
    }

    async fn request(socket: &Path, line: &str) -> String {
        let mut stream = UnixStream::connect(socket).await.unwrap();
        stream.write_all(line.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response.trim().to_string()
    }

    #[tokio::test]
    async fn test_socket_round_trip() {
        let dir = std::env::temp_dir().join(format!("raven-desknav-ipc-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let paths = ConfigPaths {
            settings: dir.join("desknav.json"),
            socket: dir.join("desknav.sock"),
        };

        let (event_tx, event_rx) = async_channel::bounded(8);
        let status: SharedStatus = Arc::new(RwLock::new(NavigatorStatus {
            continuation_delay_ms: 500,
            ..Default::default()
        }));
        let server = tokio::spawn(IpcServer::new(&paths, event_tx, status).run());

        // Wait for the listener to come up
        for _ in 0..50 {
            if paths.socket.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(request(&paths.socket, "previous\n").await, "ok");
        match event_rx.recv().await.unwrap() {
            NavigatorEvent::Shortcut { action, .. } => assert_eq!(action, ShortcutAction::PreviousDesktop),
            other => panic!("unexpected event: {:?}", other),
        }

        let status: NavigatorStatus =
            serde_json::from_str(&request(&paths.socket, "status\n").await).unwrap();
        assert_eq!(status.continuation_delay_ms, 500);

        assert!(request(&paths.socket, "toggle 0\n").await.starts_with("error:"));

        assert_eq!(request(&paths.socket, "reload-config\n").await, "ok");
        assert!(matches!(
            event_rx.recv().await.unwrap(),
            NavigatorEvent::SettingsReloaded(settings) if settings == NavigatorSettings::default()
        ));

        server.abort();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_refuses_live_socket_and_replaces_stale_one() {
        let dir = std::env::temp_dir().join(format!("raven-desknav-bind-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let paths = ConfigPaths {
            settings: dir.join("desknav.json"),
            socket: dir.join("desknav.sock"),
        };
        let status: SharedStatus = Arc::new(RwLock::new(NavigatorStatus::default()));
        let (event_tx, _event_rx) = async_channel::bounded(8);

        // Left behind by a navigator that exited without cleaning up
        drop(std::os::unix::net::UnixListener::bind(&paths.socket).unwrap());
        assert!(paths.socket.exists());

        let first = IpcServer::new(&paths, event_tx.clone(), status.clone());
        let listener = first.bind().await.unwrap();

        let second = IpcServer::new(&paths, event_tx, status);
        let err = second.bind().await.unwrap_err();
        assert!(err.to_string().contains("already running"));

        drop(listener);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
