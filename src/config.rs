use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight connections during shutdown before
    /// aborting them.
    pub shutdown_grace: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FtpConfig {
    pub root_dir: String,
    pub max_connections: u32, // advisory, not enforced by the connection core
    pub timeout: u64,         // advisory session timeout in seconds
    pub upload_buffer_size: Option<usize>, // Optional to allow default value
    pub download_buffer_size: Option<usize>, // Optional to allow default value
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AuthConfig {
    pub anonymous: bool,
    pub users: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ftp: FtpConfig,
    pub auth: AuthConfig,
    pub log: LogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: 2121,
            shutdown_grace: Some(10),
        }
    }
}

impl Default for FtpConfig {
    fn default() -> Self {
        Self {
            root_dir: String::from("./ftp_root"),
            max_connections: 100,
            timeout: 300,
            upload_buffer_size: Some(8 * 1024),
            download_buffer_size: Some(8 * 1024),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            anonymous: true,
            users: HashMap::from([(String::from("anonymous"), String::from("anonymous"))]),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            ftp: FtpConfig::default(),
            auth: AuthConfig::default(),
            log: LogConfig::default(),
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
        if config.server.shutdown_grace.is_none() {
            config.server.shutdown_grace = Some(10);
        }
        if config.ftp.upload_buffer_size.is_none() {
            config.ftp.upload_buffer_size = Some(8 * 1024);
        }
        if config.ftp.download_buffer_size.is_none() {
            config.ftp.download_buffer_size = Some(8 * 1024);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_tables() {
        let config = Config::default();
        assert_eq!(config.server.port, 2121);
        assert_eq!(config.ftp.root_dir, "./ftp_root");
        assert!(config.auth.anonymous);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn parses_full_toml() {
        let raw = r#"
            [server]
            host = "0.0.0.0"
            port = 2100

            [ftp]
            root_dir = "/srv/ftp"
            max_connections = 5
            timeout = 60

            [auth]
            anonymous = false
            [auth.users]
            alice = "secret"

            [log]
            level = "debug"
            format = "text"
        "#;
        let mut config: Config = toml::from_str(raw).unwrap();
        if config.ftp.upload_buffer_size.is_none() {
            config.ftp.upload_buffer_size = Some(8 * 1024);
        }
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 2100);
        assert_eq!(config.ftp.root_dir, "/srv/ftp");
        assert!(!config.auth.anonymous);
        assert_eq!(config.auth.users.get("alice").unwrap(), "secret");
        assert_eq!(config.ftp.upload_buffer_size, Some(8 * 1024));
    }
}
