pub mod config;
pub mod core_cli;
pub mod core_error;
pub mod core_ftpcommand;
pub mod core_network;
pub mod core_vfs;
pub mod server;
pub mod session;

pub use config::Config;
