use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_PORT: &str = "5000";
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_MONGODB_DB: &str = "nootropic-nexus";

#[derive(Error, Debug)]
#[error("Invalid {key} value: {reason}")]
pub struct ConfigError {
    pub key: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub mongodb_uri: String,
    pub mongodb_db: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            mongodb_uri: DEFAULT_MONGODB_URI.to_string(),
            mongodb_db: DEFAULT_MONGODB_DB.to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv();

        let mongodb_uri = match read_secret("MONGODB_URI") {
            Some(uri) => uri,
            None => try_load("MONGODB_URI", DEFAULT_MONGODB_URI)?,
        };

        Ok(Self {
            port: try_load("RUST_PORT", DEFAULT_PORT)?,
            mongodb_uri,
            mongodb_db: try_load("MONGODB_DB", DEFAULT_MONGODB_DB)?,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");

            ConfigError {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })
}

/// Docker-style secret file. Absent or unreadable means fall back to the environment.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            info!("No {secret_name} secret at {path}: {e}");
        })
        .ok()
        .filter(|s| !s.is_empty())
}
