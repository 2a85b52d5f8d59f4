use crate::core_error::CommandError;
use crate::core_ftpcommand::utils::{require_arg, resolve_paths, send_response};
use crate::core_network::data::open_data_connection;
use crate::session::Session;
use crate::Config;
use log::{error, info};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Handles the RETR (Retrieve) FTP command.
///
/// Validates the target and opens the local file before anything is said on
/// the control channel, then opens the data connection, sends the 150 mark,
/// and copies the file out in fixed-size chunks until EOF. The terminal 226
/// is the only acknowledgment after the 150.
///
/// # Arguments
///
/// * `writer` - A shared, locked write half of the control connection.
/// * `config` - A shared server configuration.
/// * `session` - A shared, locked session containing the user's current state.
/// * `arg` - The virtual path of the file to retrieve.
pub async fn handle_retr_command(
    writer: Arc<Mutex<OwnedWriteHalf>>,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), CommandError> {
    let arg = require_arg(&arg)?;

    let (real_path, transfer_type) = {
        let session = session.lock().await;
        let (_, real_path) = resolve_paths(&session, arg);
        (real_path, session.transfer_type)
    };
    info!("Send try file: {:?}", real_path);

    if !real_path.is_file() {
        return Err(CommandError::not_found("Not a plain file."));
    }
    let mut file = match File::open(&real_path).await {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to open {:?}: {}", real_path, e);
            return Err(CommandError::not_found("No such file."));
        }
    };

    let mut data_stream = open_data_connection(&session).await?;
    send_response(&writer, 150, "Opening data connection.").await?;

    let mut buffer = vec![0; config.buffer_size()];
    loop {
        let bytes_read = match file.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                error!("Error reading file {:?}: {}", real_path, e);
                return Err(CommandError::data_io());
            }
        };
        let chunk = transfer_type.encode(&buffer[..bytes_read]);
        if let Err(e) = data_stream.write_all(&chunk).await {
            error!("Error sending file to client: {}", e);
            return Err(CommandError::data_io());
        }
    }

    if let Err(e) = data_stream.shutdown().await {
        error!("Error closing data connection: {}", e);
        return Err(CommandError::data_io());
    }

    send_response(&writer, 226, "Transfer complete.").await?;
    info!("File sent: {:?}", real_path);
    Ok(())
}
