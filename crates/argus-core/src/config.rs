//! Configuration management for Argus services.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`ARGUS__` prefix, `__` separator)
//! 2. Config file (`argus.toml`)
//! 3. Defaults

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Top-level Argus configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArgusConfig {
    #[serde(default)]
    pub graph: GraphSettings,

    #[serde(default)]
    pub notifications: NotificationSettings,
}

/// Connection settings for the Neo4j graph store.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphSettings {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_password")]
    pub password: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

/// Settings for the in-process notification bus.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    /// Broadcast channel capacity; slow subscribers past this lag are
    /// dropped rather than allowed to stall mutations.
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,
}

impl ArgusConfig {
    /// Load configuration from `argus.toml` and `ARGUS__*` env vars.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("argus").required(false))
            .add_source(config::Environment::with_prefix("ARGUS").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_password() -> String {
    "argus-dev".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_bus_capacity() -> usize {
    256
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: default_password(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            bus_capacity: default_bus_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ArgusConfig::default();
        assert_eq!(cfg.graph.uri, "bolt://localhost:7687");
        assert_eq!(cfg.graph.max_connections, 16);
        assert_eq!(cfg.notifications.bus_capacity, 256);
    }
}
