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

/// Handles the STOR (Store File) FTP command.
///
/// Refuses to overwrite: the target must not exist. The data connection is
/// opened before the local file is created, then the client's bytes are
/// consumed in fixed-size chunks until the client closes its end.
///
/// # Arguments
///
/// * `writer` - A shared, locked write half of the control connection.
/// * `config` - A shared server configuration.
/// * `session` - A shared, locked session containing the user's current state.
/// * `arg` - The virtual path to store the upload at.
pub async fn handle_stor_command(
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
    info!("Upload file to: {:?}", real_path);

    if real_path.exists() {
        return Err(CommandError::not_found("File exists in that location."));
    }

    // Connect toward the client before touching the disk, so a refused data
    // connection leaves no empty file behind for the retry to trip over.
    let mut data_stream = open_data_connection(&session).await?;

    let mut file = match File::create(&real_path).await {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to create {:?}: {}", real_path, e);
            return Err(CommandError::not_found("No such file."));
        }
    };
    send_response(&writer, 150, "Opening data connection.").await?;

    let mut buffer = vec![0; config.buffer_size()];
    loop {
        let bytes_read = match data_stream.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                error!("Error reading from data connection: {}", e);
                return Err(CommandError::data_io());
            }
        };
        let chunk = transfer_type.encode(&buffer[..bytes_read]);
        if let Err(e) = file.write_all(&chunk).await {
            error!("Error writing to file {:?}: {}", real_path, e);
            return Err(CommandError::data_io());
        }
    }

    if let Err(e) = file.flush().await {
        error!("Error flushing file {:?}: {}", real_path, e);
        return Err(CommandError::data_io());
    }

    send_response(&writer, 226, "Transfer complete.").await?;
    info!("File stored: {:?}", real_path);
    Ok(())
}
