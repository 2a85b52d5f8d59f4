use crate::core_error::CommandError;
use crate::core_ftpcommand::utils::send_response;
use crate::session::Session;
use log::info;
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Handles the QUIT FTP command.
///
/// Clears the authentication state, says goodbye, and lets the dispatcher
/// close the control connection.
pub async fn handle_quit_command(
    writer: Arc<Mutex<OwnedWriteHalf>>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), CommandError> {
    {
        let mut session = session.lock().await;
        session.authenticated = false;
        session.pending_user = None;
    }
    info!("Client quitting");

    send_response(&writer, 221, "Goodbye...").await?;
    Ok(())
}
