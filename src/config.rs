//! Configuration
//!
//! Everything is read from environment variables, with defaults that run a
//! file-backed ledger on port 8080.
//!
//! | Variable                         | Default          |
//! |----------------------------------|------------------|
//! | `EGG_TRACKER_BIND_ADDR`          | `0.0.0.0:8080`   |
//! | `EGG_TRACKER_DATA_PATH`          | `data/eggs.json` |
//! | `EGG_TRACKER_MAX_CONNECTIONS`    | `256`            |
//! | `EGG_TRACKER_IDLE_TIMEOUT_SECS`  | `300`            |
//! | `EGG_TRACKER_SPECKLE_TUNING`     | `revised`        |
//!
//! A data path of `memory` selects the in-memory store.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::network::server::ServerConfig;
use crate::store::{EggStore, FileStore, MemoryStore, StoreError};

/// Bind address variable.
pub const ENV_BIND_ADDR: &str = "EGG_TRACKER_BIND_ADDR";
/// Ledger location variable.
pub const ENV_DATA_PATH: &str = "EGG_TRACKER_DATA_PATH";
/// Connection limit variable.
pub const ENV_MAX_CONNECTIONS: &str = "EGG_TRACKER_MAX_CONNECTIONS";
/// Idle timeout variable.
pub const ENV_IDLE_TIMEOUT_SECS: &str = "EGG_TRACKER_IDLE_TIMEOUT_SECS";
/// Speckle tuning variable.
pub const ENV_SPECKLE_TUNING: &str = "EGG_TRACKER_SPECKLE_TUNING";

/// Default ledger file.
pub const DEFAULT_DATA_PATH: &str = "data/eggs.json";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("invalid {key}={value:?}: {reason}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
        /// Parser message.
        reason: String,
    },
}

/// Where the ledger lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// In memory; lost on restart.
    Memory,
    /// JSON file at the given path.
    File(PathBuf),
}

impl StoreBackend {
    /// Open the configured store.
    pub fn open(&self) -> Result<Box<dyn EggStore>, StoreError> {
        match self {
            StoreBackend::Memory => Ok(Box::new(MemoryStore::new())),
            StoreBackend::File(path) => Ok(Box::new(FileStore::open(path.clone())?)),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Err("empty path".to_string())
        } else if s.eq_ignore_ascii_case("memory") {
            Ok(StoreBackend::Memory)
        } else {
            Ok(StoreBackend::File(PathBuf::from(s)))
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Network server settings.
    pub server: ServerConfig,
    /// Ledger backend.
    pub store: StoreBackend,
}

impl AppConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        let server = ServerConfig {
            bind_addr: parse_or(&lookup, ENV_BIND_ADDR, defaults.bind_addr)?,
            max_connections: parse_or(&lookup, ENV_MAX_CONNECTIONS, defaults.max_connections)?,
            idle_timeout: Duration::from_secs(parse_or(
                &lookup,
                ENV_IDLE_TIMEOUT_SECS,
                defaults.idle_timeout.as_secs(),
            )?),
            speckle_tuning: parse_or(&lookup, ENV_SPECKLE_TUNING, defaults.speckle_tuning)?,
            ..defaults
        };

        let store = parse_or(
            &lookup,
            ENV_DATA_PATH,
            StoreBackend::File(PathBuf::from(DEFAULT_DATA_PATH)),
        )?;

        Ok(Self { server, store })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default");
            Ok(default)
        }
    }
}
