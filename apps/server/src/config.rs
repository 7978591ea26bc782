//! # Server Configuration
//!
//! Configuration management for the Kardex API server.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KARDEX_HOST=0.0.0.0                                                │
//! │     KARDEX_PORT=5001                                                   │
//! │     KARDEX_SEED_DEMO=true                                              │
//! │     KARDEX_RECENT_LIMIT=5                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ./kardex.toml (or KARDEX_CONFIG=/path/to/file)                     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     127.0.0.1:5001, demo seed on, 5 recent restocks                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # kardex.toml
//! [server]
//! host = "127.0.0.1"
//! port = 5001
//!
//! [inventory]
//! seed_demo = true    # Start with the sample catalog
//! recent_limit = 5    # Entries returned by the recent-restocks view
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ServerError, ServerResult};

// =============================================================================
// Settings Sections
// =============================================================================

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: String,

    /// TCP port to bind.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 5001,
        }
    }
}

/// Inventory behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventorySettings {
    /// Seed the store with the sample catalog on startup.
    pub seed_demo: bool,

    /// How many entries the recent-restocks view returns.
    pub recent_limit: usize,
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            seed_demo: true,
            recent_limit: 5,
        }
    }
}

// =============================================================================
// Kardex Config
// =============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KardexConfig {
    /// HTTP listener settings.
    pub server: ServerSettings,

    /// Inventory behavior settings.
    pub inventory: InventorySettings,
}

impl KardexConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (kardex.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ServerResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ServerResult<()> {
        if self.server.host.is_empty() {
            return Err(ServerError::InvalidConfig("host must not be empty".into()));
        }
        if self.inventory.recent_limit == 0 {
            return Err(ServerError::InvalidConfig(
                "recent_limit must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("KARDEX_HOST") {
            debug!(host = %host, "Overriding host from environment");
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("KARDEX_PORT") {
            if let Ok(p) = port.parse::<u16>() {
                debug!(port = p, "Overriding port from environment");
                self.server.port = p;
            } else {
                warn!(port = %port, "Ignoring unparseable KARDEX_PORT");
            }
        }

        if let Ok(seed) = std::env::var("KARDEX_SEED_DEMO") {
            match seed.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.inventory.seed_demo = true,
                "0" | "false" | "no" => self.inventory.seed_demo = false,
                _ => warn!(value = %seed, "Ignoring unrecognized KARDEX_SEED_DEMO"),
            }
        }

        if let Ok(limit) = std::env::var("KARDEX_RECENT_LIMIT") {
            if let Ok(n) = limit.parse::<usize>() {
                self.inventory.recent_limit = n;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        std::env::var("KARDEX_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(|| Some(PathBuf::from("kardex.toml")))
    }

    /// The address string the listener binds.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
