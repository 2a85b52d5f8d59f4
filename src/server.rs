use crate::core_network::network;
use crate::Config;
use anyhow::Result;
use log::info;
use std::sync::Arc;

/// Runs the FTP server with the provided configuration.
///
/// Binds the control listener and serves connections until the process is
/// stopped; each accepted connection gets its own session and task.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting server on port {}", config.server.listen_port);
    info!(
        "Accepted user: {} (single credential pair)",
        config.server.username
    );

    network::start_server(Arc::new(config)).await
}
