mod daemon;
mod ipc;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use raven_desknav_core::{ConfigPaths, NavigatorSettings, ShortcutAction, SlotNumber};

#[derive(Parser)]
#[command(name = "raven-desknav")]
#[command(about = "Previous-desktop and toggle navigation for Raven Desktop on Hyprland")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to ~/.config/raven/desknav.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run as daemon (default)
    Daemon,
    /// Walk back to the previously used desktop
    Previous,
    /// Switch to a desktop by number, or back again if already there
    Toggle {
        /// Desktop number, starting at 1
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        slot: SlotNumber,
    },
    /// Show navigator status
    Status {
        /// Print the raw JSON status
        #[arg(long)]
        json: bool,
    },
    /// Reload the settings file
    ReloadConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut paths = ConfigPaths::new();
    if let Some(config) = cli.config {
        paths.settings = config;
    }

    match cli.command {
        Some(Command::Daemon) | None => {
            let settings = NavigatorSettings::load(&paths.settings);
            let log = logging::init(settings.debug_logging())?;
            info!("Starting Raven desktop navigator");
            daemon::run(paths, settings, log)
        }
        Some(Command::Previous) => ipc::send_shortcut(&paths, ShortcutAction::PreviousDesktop),
        Some(Command::Toggle { slot }) => {
            ipc::send_shortcut(&paths, ShortcutAction::ToggleDesktop(slot))
        }
        Some(Command::Status { json }) => ipc::show_status(&paths, json),
        Some(Command::ReloadConfig) => ipc::send_reload_config(&paths),
    }
}
