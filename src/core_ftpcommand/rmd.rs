use crate::core_error::CommandError;
use crate::core_ftpcommand::utils::{require_arg, resolve_paths, send_response};
use crate::session::Session;
use crate::Config;
use log::{error, info};
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Handles the RMD (Remove Directory) FTP command. The directory must exist
/// and be empty; a populated directory fails the removal.
pub async fn handle_rmd_command(
    writer: Arc<Mutex<OwnedWriteHalf>>,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), CommandError> {
    let arg = require_arg(&arg)?;

    let (_, real_path) = {
        let session = session.lock().await;
        resolve_paths(&session, arg)
    };

    if !real_path.exists() {
        return Err(CommandError::not_found(format!(
            "{}: directory does not exist",
            arg
        )));
    }
    if !real_path.is_dir() {
        return Err(CommandError::not_found(format!("{}: not a directory", arg)));
    }

    if let Err(e) = tokio::fs::remove_dir(&real_path).await {
        error!("Failed to remove directory {:?}: {}", real_path, e);
        return Err(CommandError::not_found(format!(
            "{}: could not remove directory",
            arg
        )));
    }
    info!("Directory removed: {:?}", real_path);

    send_response(&writer, 250, "RMD command successful.").await?;
    Ok(())
}
