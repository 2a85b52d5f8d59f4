use crate::core_error::CommandError;
use crate::core_ftpcommand::utils::{resolve_paths, send_response};
use crate::core_network::data::open_data_connection;
use crate::session::Session;
use crate::Config;
use chrono::{DateTime, Local};
use log::{error, info};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// One directory entry as the listing renders it.
#[derive(Debug)]
pub struct ListEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: DateTime<Local>,
}

/// Renders the full listing text: a `total <count>` header, one line per
/// entry in enumeration order, and a terminating blank line. FTP clients
/// parse this positionally, so the column layout is a compatibility
/// contract.
pub fn render_listing(entries: &[ListEntry]) -> String {
    let mut out = format!("total {}\n", entries.len());
    for entry in entries {
        out.push_str(&format_list_line(entry));
    }
    out.push_str("\r\n");
    out
}

/// One listing line: kind + fixed `rwxrwxrwx` display permissions, link
/// count `1`, `ftp ftp` owner and group, size right-justified to 8 columns,
/// `MMM dd hh:mm` timestamp, name.
fn format_list_line(entry: &ListEntry) -> String {
    let kind = if entry.is_dir { 'd' } else { '-' };
    let date = entry.modified.format("%b %d %I:%M");
    format!(
        "{}rwxrwxrwx 1 ftp ftp {:>8} {} {}\n",
        kind, entry.size, date, entry.name
    )
}

/// Handles the LIST FTP command.
///
/// Without an argument the current directory is listed. The listing travels
/// over the data connection like any other transfer, bracketed by the
/// 150/226 pair on the control channel.
pub async fn handle_list_command(
    writer: Arc<Mutex<OwnedWriteHalf>>,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), CommandError> {
    let (real_path, transfer_type) = {
        let session = session.lock().await;
        let target = if arg.trim().is_empty() {
            session.current_dir.clone()
        } else {
            arg.trim().to_string()
        };
        let (_, real_path) = resolve_paths(&session, &target);
        (real_path, session.transfer_type)
    };
    info!("Listing directory: {:?}", real_path);

    let mut entries = Vec::new();
    let mut read_dir = match tokio::fs::read_dir(&real_path).await {
        Ok(rd) => rd,
        Err(e) => {
            error!("Failed to read directory {:?}: {}", real_path, e);
            return Err(CommandError::not_found("No such directory."));
        }
    };
    // Native enumeration order, no sort.
    loop {
        let entry = match read_dir.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to enumerate {:?}: {}", real_path, e);
                return Err(CommandError::not_found("No such directory."));
            }
        };
        let metadata = match entry.metadata().await {
            Ok(m) => m,
            Err(e) => {
                error!("Failed to stat {:?}: {}", entry.path(), e);
                return Err(CommandError::not_found("No such directory."));
            }
        };
        let modified = metadata
            .modified()
            .unwrap_or(SystemTime::UNIX_EPOCH);
        entries.push(ListEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: metadata.is_dir(),
            size: metadata.len(),
            modified: DateTime::<Local>::from(modified),
        });
    }

    let mut data_stream = open_data_connection(&session).await?;
    send_response(&writer, 150, "Opening data connection.").await?;

    let listing = render_listing(&entries);
    let payload = transfer_type.encode(listing.as_bytes());
    if let Err(e) = data_stream.write_all(&payload).await {
        error!("Error sending listing to client: {}", e);
        return Err(CommandError::not_found("No such directory."));
    }
    if let Err(e) = data_stream.shutdown().await {
        error!("Error closing data connection: {}", e);
        return Err(CommandError::not_found("No such directory."));
    }

    send_response(&writer, 226, "Transfer complete.").await?;
    Ok(())
}
