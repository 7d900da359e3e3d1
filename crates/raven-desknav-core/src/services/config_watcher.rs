use async_channel::Sender;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::{ConfigPaths, NavigatorSettings};
use crate::messages::NavigatorEvent;

/// Service that watches the settings file for changes using inotify
pub struct ConfigWatcher {
    paths: ConfigPaths,
    event_tx: Sender<NavigatorEvent>,
}

impl ConfigWatcher {
    pub fn new(paths: ConfigPaths, event_tx: Sender<NavigatorEvent>) -> Self {
        Self { paths, event_tx }
    }

    /// Run the config watcher (blocks forever)
    pub async fn run(self) -> anyhow::Result<()> {
        info!("Starting config watcher");

        let settings_dir = self.paths.settings_dir();
        let _ = tokio::fs::create_dir_all(&settings_dir).await;

        // Channel for file events
        let (notify_tx, mut notify_rx) = mpsc::channel::<std::path::PathBuf>(32);

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    // Only react to modifications and creations
                    if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        for path in event.paths {
                            let _ = notify_tx.blocking_send(path);
                        }
                    }
                }
            },
            notify::Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        // Watch the directory since the file might not exist yet
        if settings_dir.exists() {
            watcher.watch(&settings_dir, RecursiveMode::NonRecursive)?;
            debug!("Watching directory: {:?}", settings_dir);
        }

        // Debounce timer - wait for rapid changes to settle
        let mut debounce_deadline: Option<tokio::time::Instant> = None;

        loop {
            tokio::select! {
                Some(path) = notify_rx.recv() => {
                    if path == self.paths.settings {
                        debounce_deadline = Some(tokio::time::Instant::now() + Duration::from_millis(100));
                    }
                }

                _ = async {
                    if let Some(deadline) = debounce_deadline {
                        tokio::time::sleep_until(deadline).await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    debounce_deadline = None;
                    self.reload_settings().await;
                }
            }
        }
    }

    /// Reload navigator settings and send event
    async fn reload_settings(&self) {
        debug!("Reloading navigator settings: {:?}", self.paths.settings);

        match tokio::fs::read(&self.paths.settings).await {
            Ok(data) => match serde_json::from_slice::<NavigatorSettings>(&data) {
                Ok(settings) => {
                    info!(
                        "Navigator settings reloaded, continuation delay {}ms",
                        settings.continuation_delay().as_millis()
                    );
                    let _ = self.event_tx.send(NavigatorEvent::SettingsReloaded(settings)).await;
                }
                Err(e) => {
                    warn!("Failed to parse navigator settings: {}", e);
                }
            },
            Err(e) => {
                // File might have been removed, that's OK
                debug!("Could not read navigator settings: {}", e);
            }
        }
    }
}
