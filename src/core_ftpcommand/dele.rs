use crate::core_error::CommandError;
use crate::core_ftpcommand::utils::{require_arg, resolve_paths, send_response};
use crate::session::Session;
use crate::Config;
use log::{error, info};
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Handles the DELE (Delete File) FTP command.
pub async fn handle_dele_command(
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
            "{}: file does not exist",
            arg
        )));
    }

    if let Err(e) = tokio::fs::remove_file(&real_path).await {
        error!("Failed to delete file {:?}: {}", real_path, e);
        return Err(CommandError::not_found(format!(
            "{}: could not delete file",
            arg
        )));
    }
    info!("File deleted: {:?}", real_path);

    send_response(&writer, 250, "DELE command successful.").await?;
    Ok(())
}
