use crate::core_ftpcommand::handlers::{dispatch_command, initialize_command_handlers};
use crate::core_ftpcommand::utils::send_response;
use crate::session::Session;
use crate::Config;
use anyhow::{Context, Result};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

/// Longest accepted command line, matching the frame limit of the wire
/// protocol. Anything longer tears the connection down.
const MAX_LINE_LENGTH: usize = 256;

pub async fn start_server(config: Arc<Config>) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", config.server.listen_port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.server.listen_port))?;
    info!("Server listening on port {}", config.server.listen_port);
    serve(listener, config).await
}

/// Accept loop over an already-bound listener. Each accepted connection gets
/// a fresh session and its own task, so one client's slow transfer never
/// stalls another's control channel.
pub async fn serve(listener: TcpListener, config: Arc<Config>) -> Result<()> {
    let base_path = if config.server.server_root.is_empty() {
        std::env::current_dir().context("Failed to determine working directory")?
    } else {
        PathBuf::from(&config.server.server_root)
    };
    let base_path = base_path
        .canonicalize()
        .with_context(|| format!("Invalid server root: {:?}", base_path))?;
    info!("Serving files from {:?}", base_path);

    loop {
        let (socket, addr) = listener.accept().await?;
        info!("New connection from {}", addr);

        let config = Arc::clone(&config);
        let session = Arc::new(Mutex::new(Session::new(base_path.clone())));

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, config, session).await {
                warn!("Connection error for {}: {:?}", addr, e);
            }
            info!("Connection closed for {}", addr);
        });
    }
}

/// Services one control connection: greeting, then one command / one
/// response cycle at a time until QUIT, EOF, or a transport fault.
pub async fn handle_connection(
    socket: TcpStream,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
) -> Result<()> {
    let (read_half, write_half) = socket.into_split();
    let writer = Arc::new(Mutex::new(write_half));

    send_response(
        &writer,
        220,
        &format!("givreftpd ({}) ready.", env!("CARGO_PKG_VERSION")),
    )
    .await?;

    let handlers = initialize_command_handlers();
    let mut reader = BufReader::new(read_half);
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        // The read itself is capped: a line must fit the frame limit,
        // delimiter included, or nothing past it is ever buffered.
        let n = (&mut reader)
            .take(MAX_LINE_LENGTH as u64 + 1)
            .read_until(b'\n', &mut buffer)
            .await?;
        if n == 0 {
            info!("Client disconnected");
            break;
        }
        if buffer.last() != Some(&b'\n') {
            if n > MAX_LINE_LENGTH {
                warn!("Command line exceeds {} bytes, closing", MAX_LINE_LENGTH);
            } else {
                info!("Client disconnected mid-line");
            }
            break;
        }

        // Leading whitespace would desync verb/argument splitting downstream.
        let line = String::from_utf8_lossy(&buffer);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        info!("Line: {}", line);

        match dispatch_command(
            &handlers,
            Arc::clone(&writer),
            Arc::clone(&config),
            Arc::clone(&session),
            line,
        )
        .await
        {
            Ok(true) => {}
            Ok(false) => break, // QUIT
            Err(e) => {
                error!("Control connection failure: {}", e);
                break;
            }
        }
    }
    Ok(())
}
