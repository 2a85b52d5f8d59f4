use crate::core_error::CommandError;
use crate::core_ftpcommand::utils::{require_arg, resolve_paths, send_response};
use crate::core_vfs::resolver;
use crate::session::Session;
use crate::Config;
use log::{error, info};
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Handles the RNTO (Rename To) FTP command.
///
/// Renames the path stored by a preceding RNFR. RNTO without a pending
/// source fails with 550; the pending source is cleared on success only, so
/// a failed rename can be retried with another RNTO.
pub async fn handle_rnto_command(
    writer: Arc<Mutex<OwnedWriteHalf>>,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), CommandError> {
    let arg = require_arg(&arg)?;

    let mut session = session.lock().await;
    let source_virtual = session
        .rename_from
        .clone()
        .ok_or_else(|| CommandError::not_found(format!("{}: file does not exist", arg)))?;
    let source_real = resolver::to_real(&session.base_path, &source_virtual);
    let (target_virtual, target_real) = resolve_paths(&session, arg);

    if let Err(e) = tokio::fs::rename(&source_real, &target_real).await {
        error!(
            "Failed to rename {:?} to {:?}: {}",
            source_real, target_real, e
        );
        return Err(CommandError::not_found(format!(
            "{}: file does not exist",
            arg
        )));
    }

    session.rename_from = None;
    info!("Renamed {} to {}", source_virtual, target_virtual);

    send_response(&writer, 250, "RNTO command successful.").await?;
    Ok(())
}
