//! # Application Configuration
//!
//! Database location and billing defaults.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     WASHGO_DB_PATH=/srv/washgo/washgo.db                                │
//! │     WASHGO_DB_MAX_CONNECTIONS=8                                         │
//! │     WASHGO_VAT_ENABLED=false                                            │
//! │     WASHGO_VAT_RATE=20                                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/washgo/washgo.toml (Linux)                                │
//! │     ~/Library/Application Support/fr.washgo.washgo/washgo.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     ./washgo.db, 5 connections, VAT 20 % enabled                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/srv/washgo/washgo.db"
//! max_connections = 5
//!
//! [billing]
//! vat_enabled = true
//! vat_rate = 20.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use washgo_core::validation::validate_vat_rate_bps;
use washgo_core::{BillingSettings, VatRate};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Database Settings
// =============================================================================

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file location.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("washgo.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Billing Settings
// =============================================================================

/// `[billing]` section, as written by a person: the rate is a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Default VAT policy when neither engagement nor company decide.
    #[serde(default = "default_true")]
    pub vat_enabled: bool,

    /// VAT rate in percent (20.0 = 20 %).
    #[serde(default = "default_vat_rate")]
    pub vat_rate: f64,
}

fn default_true() -> bool {
    true
}

fn default_vat_rate() -> f64 {
    20.0
}

impl Default for BillingConfig {
    fn default() -> Self {
        BillingConfig {
            vat_enabled: true,
            vat_rate: default_vat_rate(),
        }
    }
}

impl BillingConfig {
    /// The snapshot handed to the pricing functions.
    pub fn settings(&self) -> BillingSettings {
        BillingSettings {
            vat_enabled: self.vat_enabled,
            vat_rate: VatRate::from_percentage(self.vat_rate),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub billing: BillingConfig,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (washgo.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
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

    /// Saves configuration to file, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::Invalid("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if !self.billing.vat_rate.is_finite() || self.billing.vat_rate < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "billing.vat_rate must be a non-negative number, got {}",
                self.billing.vat_rate
            )));
        }

        validate_vat_rate_bps(self.billing.settings().vat_rate.bps())
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(())
    }

    /// Billing snapshot for the pricing functions.
    pub fn billing_settings(&self) -> BillingSettings {
        self.billing.settings()
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("WASHGO_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Ok(max) = std::env::var("WASHGO_DB_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(n) => self.database.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring invalid WASHGO_DB_MAX_CONNECTIONS"),
            }
        }

        if let Ok(enabled) = std::env::var("WASHGO_VAT_ENABLED") {
            match enabled.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.billing.vat_enabled = true,
                "0" | "false" | "no" | "off" => self.billing.vat_enabled = false,
                _ => warn!(value = %enabled, "Ignoring invalid WASHGO_VAT_ENABLED"),
            }
        }

        if let Ok(rate) = std::env::var("WASHGO_VAT_RATE") {
            match rate.parse::<f64>() {
                Ok(r) => {
                    debug!(rate = r, "Overriding VAT rate from environment");
                    self.billing.vat_rate = r;
                }
                Err(_) => warn!(value = %rate, "Ignoring invalid WASHGO_VAT_RATE"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("fr", "washgo", "washgo")
            .map(|dirs| dirs.config_dir().join("washgo.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.database.max_connections, 5);
        assert!(config.billing.vat_enabled);
        assert_eq!(config.billing_settings().vat_rate.bps(), 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        config.database.max_connections = 5;
        config.billing.vat_rate = -1.0;
        assert!(config.validate().is_err());

        config.billing.vat_rate = 150.0;
        assert!(config.validate().is_err());

        config.billing.vat_rate = 5.5;
        assert!(config.validate().is_ok());
        assert_eq!(config.billing_settings().vat_rate.bps(), 550);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("[billing]\nvat_enabled = false\n").unwrap();
        assert!(!config.billing.vat_enabled);
        assert_eq!(config.billing.vat_rate, 20.0);
        assert_eq!(config.database, DatabaseSettings::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("washgo.toml");

        let mut config = AppConfig::default();
        config.database.path = dir.path().join("data.db");
        config.billing.vat_rate = 10.0;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[database]"));
        assert!(contents.contains("[billing]"));

        let parsed: AppConfig = toml::from_str(&contents).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("washgo.toml");
        std::fs::write(&path, "[database\npath = 3").unwrap();

        assert!(matches!(
            AppConfig::load(Some(path.clone())),
            Err(ConfigError::Parse(_))
        ));
        // load_or_default falls back instead
        let config = AppConfig::load_or_default(Some(path));
        assert_eq!(config.database.max_connections, 5);
    }
}
