use crate::core_error::CommandError;
use crate::core_ftpcommand::utils::send_response;
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Handles the SYST FTP command by reporting the system type.
pub async fn handle_syst_command(
    writer: Arc<Mutex<OwnedWriteHalf>>,
) -> Result<(), CommandError> {
    send_response(&writer, 215, "UNIX").await?;
    Ok(())
}
