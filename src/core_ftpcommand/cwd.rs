use crate::core_error::CommandError;
use crate::core_ftpcommand::utils::{require_arg, resolve_paths, send_response};
use crate::session::Session;
use crate::Config;
use log::info;
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Handles the CWD FTP command.
///
/// Resolves the argument against the current directory, verifies the real
/// path is an existing directory under the server root, and updates the
/// session's working directory.
pub async fn handle_cwd_command(
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
            "{}: no such directory",
            arg
        )));
    }
    if !real_path.is_dir() {
        return Err(CommandError::not_found(format!("{}: not a directory", arg)));
    }

    session.current_dir = virtual_path;
    info!("New current dir: {}", session.current_dir);

    send_response(&writer, 250, "CWD command successful.").await?;
    Ok(())
}
