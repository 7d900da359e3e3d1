use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

use raven_desknav_core::{ConfigPaths, NavigatorStatus, ShortcutAction};

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

    let response = response.trim().to_string();
    if let Some(message) = response.strip_prefix("error:") {
        return Err(anyhow::anyhow!("{}", message.trim()));
    }

    Ok(response)
}

/// Send a shortcut press
pub fn send_shortcut(paths: &ConfigPaths, action: ShortcutAction) -> anyhow::Result<()> {
    let response = send_command(&paths.socket, &action.ipc_command())?;
    println!("{}", response);
    Ok(())
}

/// Send reload config command
pub fn send_reload_config(paths: &ConfigPaths) -> anyhow::Result<()> {
    let response = send_command(&paths.socket, "reload-config")?;
    println!("{}", response);
    Ok(())
}

/// Show navigator status
pub fn show_status(paths: &ConfigPaths, json: bool) -> anyhow::Result<()> {
    let response = send_command(&paths.socket, "status")?;
    if json {
        println!("{}", response);
        return Ok(());
    }

    let status: NavigatorStatus = serde_json::from_str(&response)?;
    println!(
        "Compositor: {}",
        if status.connected { "connected" } else { "disconnected" }
    );
    println!("Continuation delay: {}ms", status.continuation_delay_ms);
    println!("Registered shortcuts: {}", status.registered_shortcuts);

    println!("History (oldest first):");
    for (position, entry) in status.history.iter().enumerate() {
        let marker = if status.candidate == Some(position) { "*" } else { " " };
        match entry.slot {
            Some(slot) => println!(" {} {} (slot {})", marker, entry.id, slot),
            None => println!(" {} {}", marker, entry.id),
        }
    }

    println!("Slots:");
    for slot in &status.slots {
        match &slot.name {
            Some(name) if name.as_str() != slot.id.as_str() => {
                println!("  {:>2}: {} ({})", slot.slot, slot.id, name)
            }
            _ => println!("  {:>2}: {}", slot.slot, slot.id),
        }
    }

    Ok(())
}
