use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::info;
use std::io::Write;

use givreftpd::core_cli::Cli;
use givreftpd::{server, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Initialize the logger with a custom format
    let default_filter = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    // Load configuration from the TOML file, or fall back to built-in
    // defaults when none is given
    let mut config = if args.config.is_empty() {
        info!("No configuration file given, using defaults");
        Config::default()
    } else {
        Config::load_from_file(&args.config)?
    };

    // Override the listening port from the CLI if provided
    if let Some(port) = args.port {
        config.server.listen_port = port;
    }

    // Run the FTP server
    server::run(config).await
}
