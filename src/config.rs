//! Configuration module for bistro-forms
//!
//! This module handles loading and validating configuration from environment
//! variables, providing strongly-typed configuration structures for logging,
//! rate limiting and the key-value store.

use envconfig::Envconfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::rate_limit::{JsonFileStore, KeyValueStore, MemoryStore, DEFAULT_COOLDOWN_MS};

/// Main configuration structure for bistro-forms
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct Config {
    /// Logging configuration
    #[serde(flatten)]
    #[envconfig(nested)]
    pub logging: LoggingConfig,

    /// Rate limiter configuration
    #[serde(flatten)]
    #[envconfig(nested)]
    pub rate_limit: RateLimitConfig,

    /// Key-value store configuration
    #[serde(flatten)]
    #[envconfig(nested)]
    pub storage: StorageConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct LoggingConfig {
    /// Log level
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,

    /// Environment (development, staging, production)
    #[envconfig(from = "ENVIRONMENT", default = "development")]
    pub environment: String,
}

impl LoggingConfig {
    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Rate limiter configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct RateLimitConfig {
    /// Minimum time between accepted submissions of one form type
    #[envconfig(from = "RATE_LIMIT_COOLDOWN_MS", default = "30000")]
    pub cooldown_ms: u64,

    /// Prefix for the per-form timestamp keys
    #[envconfig(from = "RATE_LIMIT_KEY_PREFIX", default = "lastSubmit_")]
    pub key_prefix: String,
}

impl RateLimitConfig {
    /// Get the cooldown as Duration
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            key_prefix: "lastSubmit_".to_string(),
        }
    }
}

/// Key-value store configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct StorageConfig {
    /// Store backend (file, memory)
    #[envconfig(from = "STORAGE_BACKEND", default = "file")]
    pub backend: String,

    /// Path of the JSON file used by the file backend
    #[envconfig(from = "STORAGE_PATH", default = "./data/form_state.json")]
    pub path: String,
}

impl StorageConfig {
    /// Build the configured store
    pub fn open(&self) -> Result<Box<dyn KeyValueStore>> {
        match self.backend.to_lowercase().as_str() {
            "file" => Ok(Box::new(JsonFileStore::new(&self.path))),
            "memory" => Ok(Box::new(MemoryStore::new())),
            other => Err(Error::config(format!(
                "Unknown storage backend '{}' (expected: file or memory)",
                other
            ))),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenv::dotenv().ok();

        Config::init_from_env().map_err(Error::from)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.rate_limit.key_prefix.trim().is_empty() {
            return Err(Error::config("Rate limit key prefix cannot be empty"));
        }

        match self.storage.backend.to_lowercase().as_str() {
            "memory" => {},
            "file" => {
                if self.storage.path.trim().is_empty() {
                    return Err(Error::config("Storage path cannot be empty"));
                }
            },
            other => {
                return Err(Error::config(format!("Unknown storage backend '{}'", other)));
            },
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!(
            environment = %self.logging.environment,
            log_level = %self.logging.log_level,
            "Logging configuration"
        );

        tracing::info!(
            cooldown_ms = %self.rate_limit.cooldown_ms,
            key_prefix = %self.rate_limit.key_prefix,
            "Rate limit configuration"
        );

        tracing::info!(
            backend = %self.storage.backend,
            path = %self.storage.path,
            "Storage configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            logging: LoggingConfig {
                log_level: "debug".to_string(),
                environment: "development".to_string(),
            },
            rate_limit: RateLimitConfig::default(),
            storage: StorageConfig {
                backend: "memory".to_string(),
                path: String::new(),
            },
        }
    }

    #[test]
    fn test_rate_limit_defaults() {
        let config = RateLimitConfig::default();
        assert_eq!(config.cooldown(), Duration::from_secs(30));
        assert_eq!(config.key_prefix, "lastSubmit_");
    }

    #[test]
    fn test_validate_accepts_memory_backend_without_path() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_file_backend_without_path() {
        let mut config = test_config();
        config.storage.backend = "file".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_backend() {
        let mut config = test_config();
        config.storage.backend = "redis".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("redis"));
    }

    #[test]
    fn test_validate_rejects_blank_key_prefix() {
        let mut config = test_config();
        config.rate_limit.key_prefix = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_open_memory_store() {
        let store = test_config().storage.open().unwrap();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn test_production_flag() {
        let mut config = test_config();
        assert!(!config.logging.is_production());
        config.logging.environment = "production".to_string();
        assert!(config.logging.is_production());
    }
}
