use crate::core_error::CommandError;
use crate::core_ftpcommand::utils::send_response;
use log::debug;
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Handles the CLNT FTP command. The client identification string is logged
/// and otherwise ignored.
pub async fn handle_clnt_command(
    writer: Arc<Mutex<OwnedWriteHalf>>,
    arg: String,
) -> Result<(), CommandError> {
    debug!("Client: {}", arg);
    send_response(&writer, 215, "CLNT command successful.").await?;
    Ok(())
}
