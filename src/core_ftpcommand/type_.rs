use crate::core_error::CommandError;
use crate::core_ftpcommand::utils::{require_arg, send_response};
use crate::session::{Session, TransferType};
use crate::Config;
use log::info;
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Handles the TYPE FTP command.
///
/// The argument must be exactly one character: `I` selects binary, anything
/// else falls back to ASCII. Longer arguments are rejected outright.
pub async fn handle_type_command(
    writer: Arc<Mutex<OwnedWriteHalf>>,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), CommandError> {
    let arg = require_arg(&arg)?;
    let arg = arg
        .split_whitespace()
        .next()
        .unwrap_or(arg)
        .to_ascii_uppercase();
    if arg.len() != 1 {
        return Err(CommandError::exception(format!(
            "TYPE: invalid argument '{}'",
            arg
        )));
    }

    let code = arg.chars().next().unwrap_or('A');
    {
        let mut session = session.lock().await;
        session.transfer_type = TransferType::from_code(code);
    }
    info!("Transfer type set to {}", code);

    send_response(&writer, 215, &format!("Type set to {}", code)).await?;
    Ok(())
}
