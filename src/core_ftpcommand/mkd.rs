use crate::core_error::CommandError;
use crate::core_ftpcommand::utils::{require_arg, resolve_paths, send_response};
use crate::session::Session;
use crate::Config;
use log::{error, info};
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Handles the MKD (Make Directory) FTP command.
///
/// The target must not exist yet; creation happens inside the server root
/// only, one level at a time.
pub async fn handle_mkd_command(
    writer: Arc<Mutex<OwnedWriteHalf>>,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), CommandError> {
    let arg = require_arg(&arg)?;

    let (virtual_path, real_path) = {
        let session = session.lock().await;
        resolve_paths(&session, arg)
    };

    if real_path.exists() {
        return Err(CommandError::not_found(format!("{}: file exists", arg)));
    }

    if let Err(e) = tokio::fs::create_dir(&real_path).await {
        error!("Failed to create directory {:?}: {}", real_path, e);
        return Err(CommandError::exception(format!(
            "{}: directory could not be created",
            arg
        )));
    }
    info!("Directory created: {:?}", real_path);

    send_response(&writer, 257, &format!("\"{}\" directory created", virtual_path)).await?;
    Ok(())
}
