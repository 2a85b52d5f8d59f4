use crate::core_error::CommandError;
use crate::core_ftpcommand::utils::send_response;
use crate::session::Session;
use crate::Config;
use log::{info, warn};
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Handles the PASS FTP command.
///
/// Checks the pending username plus the supplied password against the single
/// configured credential pair. A missing USER is a 503; a mismatch is a 530.
/// An empty password argument is allowed and compared as the empty string.
pub async fn handle_pass_command(
    writer: Arc<Mutex<OwnedWriteHalf>>,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), CommandError> {
    let password = arg.trim();

    let username = {
        let session = session.lock().await;
        session
            .pending_user
            .clone()
            .ok_or_else(CommandError::username_needed)?
    };

    if username != config.server.username || password != config.server.password {
        warn!("Login incorrect for user: {}", username);
        return Err(CommandError::login_incorrect());
    }

    {
        let mut session = session.lock().await;
        session.authenticated = true;
    }
    info!("User {} logged in", username);

    send_response(&writer, 230, "Authorization has been successfully.").await?;
    Ok(())
}
