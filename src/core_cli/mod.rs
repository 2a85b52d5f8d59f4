use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "givreftpd", about = "A minimal active-mode FTP server written in Rust.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "")]
    pub config: String,

    /// Override the configured listening port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
