use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

use clap::{Parser, Subcommand};

use raven_desknav_core::{ConfigPaths, ShortcutAction, SlotNumber};

#[derive(Parser)]
#[command(name = "desknav-ctl")]
#[command(about = "Control utility for the Raven desktop navigator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Walk back to the previously used desktop
    #[command(alias = "prev")]
    Previous,
    /// Switch to a desktop by number, or back again if already there
    Toggle {
        /// Desktop number, starting at 1
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        slot: SlotNumber,
    },
    /// Print navigator status as JSON
    Status,
    /// Reload the settings file
    ReloadConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cmd = match cli.command {
        Command::Previous => ShortcutAction::PreviousDesktop.ipc_command().to_string(),
        Command::Toggle { slot } => ShortcutAction::ToggleDesktop(slot).ipc_command().to_string(),
        Command::Status => "status".to_string(),
        Command::ReloadConfig => "reload-config".to_string(),
    };

    let paths = ConfigPaths::new();
    let response = send_command(&paths.socket, &cmd)?;
    let response = response.trim();

    if let Some(message) = response.strip_prefix("error:") {
        return Err(anyhow::anyhow!("{}", message.trim()));
    }
    println!("{}", response);

    Ok(())
}

/// Send a command to the daemon via the control socket
fn send_command(socket: &Path, cmd: &str) -> anyhow::Result<String> {
    if !socket.exists() {
        return Err(anyhow::anyhow!(
            "Desktop navigator is not running (socket not found at {:?})",
            socket
        ));
    }

    let mut stream = UnixStream::connect(socket)?;
    stream.write_all(cmd.as_bytes())?;
    stream.write_all(b"\n")?;
    stream.flush()?;

    let mut response = String::new();
    stream.read_to_string(&mut response)?;

    Ok(response)
}
