use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_port: u16,
    /// Server root directory; empty means the process working directory at startup.
    pub server_root: String,
    pub username: String,
    pub password: String,
    pub transfer_buffer_size: Option<usize>, // Optional to allow default value
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_port: 2121,
            server_root: String::new(),
            username: String::from("morf"),
            password: String::from("123"),
            transfer_buffer_size: Some(64 * 1024), // Default 64 KB
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))?;

        // Set defaults if not specified
        if config.server.transfer_buffer_size.is_none() {
            config.server.transfer_buffer_size = Some(64 * 1024);
        }

        Ok(config)
    }

    pub fn buffer_size(&self) -> usize {
        self.server.transfer_buffer_size.unwrap_or(64 * 1024)
    }
}
