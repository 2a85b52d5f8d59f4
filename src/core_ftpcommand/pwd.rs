use crate::core_error::CommandError;
use crate::core_ftpcommand::utils::send_response;
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Handles the PWD FTP command by reporting the session's current virtual
/// directory.
pub async fn handle_pwd_command(
    writer: Arc<Mutex<OwnedWriteHalf>>,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), CommandError> {
    let current_dir = session.lock().await.current_dir.clone();
    send_response(&writer, 257, &current_dir).await?;
    Ok(())
}
