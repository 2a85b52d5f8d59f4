use crate::core_error::CommandError;
use crate::session::Session;
use log::{error, info};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Opens the active-mode data connection toward the address the client
/// advertised with PORT. One transfer per connection; the caller closes it
/// when the copy is done.
///
/// Fails with 425 when no PORT address has been stored yet or the client
/// refuses the connection. The stored address is deliberately left in place
/// afterwards, so a client may reuse it across several transfers.
pub async fn open_data_connection(
    session: &Arc<Mutex<Session>>,
) -> Result<TcpStream, CommandError> {
    let addr = session
        .lock()
        .await
        .data_addr
        .ok_or_else(CommandError::data_connection)?;

    match TcpStream::connect(addr).await {
        Ok(stream) => {
            info!("Data connection established with {}", addr);
            Ok(stream)
        }
        Err(e) => {
            error!("Failed to open data connection to {}: {}", addr, e);
            Err(CommandError::data_connection())
        }
    }
}
