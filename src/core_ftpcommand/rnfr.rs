use crate::core_error::CommandError;
use crate::core_ftpcommand::utils::{require_arg, resolve_paths, send_response};
use crate::session::Session;
use crate::Config;
use log::info;
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Handles the RNFR (Rename From) FTP command.
///
/// Verifies the source exists and stores its virtual path in the session for
/// the RNTO that must follow.
pub async fn handle_rnfr_command(
    writer: Arc<Mutex<OwnedWriteHalf>>,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), CommandError> {
    let arg = require_arg(&arg)?;

    let mut session = session.lock().await;
    let (virtual_path, real_path) = resolve_paths(&session, arg);

    if !real_path.exists() {
        return Err(CommandError::not_found(format!(
            "{}: file does not exist",
            arg
        )));
    }

    info!("Rename source pending: {}", virtual_path);
    session.rename_from = Some(virtual_path);

    send_response(&writer, 350, "Pending file").await?;
    Ok(())
}
