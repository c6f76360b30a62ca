use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context};
use directories_next::ProjectDirs;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database: Database,
    pub limits: Limits,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum request body size in bytes.
    pub max_upload_size: usize,
    /// How many ids to try before giving up on creating a paste.
    pub key_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8000,
            database: Database::default(),
            limits: Limits::default(),
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Database {
            url: "sqlite://pastes.db?mode=rwc".to_owned(),
            max_connections: 5,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_upload_size: 1024 * 1024,
            key_attempts: 5,
        }
    }
}

impl Config {
    /// Parse a config file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&source).context("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.limits.key_attempts >= 1,
            "limits.key_attempts must be at least 1"
        );
        ensure!(
            self.database.max_connections >= 1,
            "database.max_connections must be at least 1"
        );
        Ok(())
    }

    /// Load the explicitly given config file, or the one in the platform config
    /// directory if it exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match default_path() {
            Some(path) if path.is_file() => Self::from_file(path),
            _ => Ok(Config::default()),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tinypaste").map(|dirs| dirs.config_dir().join("config.toml"))
}
