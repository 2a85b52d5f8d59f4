use crate::core_error::CommandError;
use crate::core_ftpcommand::utils::{require_arg, send_response};
use crate::session::Session;
use crate::Config;
use log::info;
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Handles the USER FTP command.
///
/// Stores the username for the session and asks the client for the password.
/// Always permitted, logged in or not.
///
/// # Arguments
///
/// * `writer` - A shared, locked write half of the control connection.
/// * `_config` - A shared server configuration (not used in this command).
/// * `session` - A shared, locked session containing the user's current state.
/// * `arg` - The username provided by the client.
pub async fn handle_user_command(
    writer: Arc<Mutex<OwnedWriteHalf>>,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), CommandError> {
    let username = require_arg(&arg)?;
    info!("Username: {}", username);

    {
        let mut session = session.lock().await;
        session.pending_user = Some(username.to_string());
    }

    send_response(&writer, 331, &format!("Password required for {}.", username)).await?;
    Ok(())
}
