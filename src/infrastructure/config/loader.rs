use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project configuration file, created per checkout
pub const PROJECT_CONFIG_PATH: &str = ".vault-config/config.yaml";

/// Optional local overrides, not meant to be committed
pub const LOCAL_CONFIG_PATH: &str = ".vault-config/local.yaml";

/// Prefix for nested environment overrides, e.g. `VAULT_CONFIG_VAULT__FAIL_FAST`
pub const ENV_PREFIX: &str = "VAULT_CONFIG_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Application name cannot be empty")]
    EmptyApplicationName,

    #[error("Invalid Vault URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("Secret backend cannot be empty")]
    EmptyBackend,

    #[error("Invalid timeout_secs: 0. Must be at least 1")]
    InvalidTimeout,

    #[error(
        "Invalid backoff configuration: retry_delay_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error(
        "max_priority {max_priority} leaves no room for {overlays} profile overlays below it"
    )]
    MaxPriorityTooLow { max_priority: i32, overlays: usize },

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .vault-config/config.yaml (project config)
    /// 3. .vault-config/local.yaml (local overrides, optional)
    /// 4. `VAULT_ADDR` / `VAULT_TOKEN`
    /// 5. `VAULT_CONFIG_*` environment variables, nested with `__`
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// The layered figment used by [`ConfigLoader::load`]
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(PROJECT_CONFIG_PATH))
            .merge(Yaml::file(LOCAL_CONFIG_PATH))
            .merge(
                Env::raw()
                    .only(&["VAULT_ADDR", "VAULT_TOKEN"])
                    .map(|key| {
                        if key.as_str().eq_ignore_ascii_case("VAULT_ADDR") {
                            "vault.uri".into()
                        } else {
                            "vault.token".into()
                        }
                    }),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.application.name.trim().is_empty() {
            return Err(ConfigError::EmptyApplicationName);
        }

        let vault = &config.vault;
        if vault.uri.trim().is_empty() {
            return Err(ConfigError::InvalidUri {
                uri: vault.uri.clone(),
                reason: "empty".to_string(),
            });
        }
        let url = reqwest::Url::parse(&vault.uri).map_err(|err| ConfigError::InvalidUri {
            uri: vault.uri.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUri {
                uri: vault.uri.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if vault.backend.trim().is_empty() {
            return Err(ConfigError::EmptyBackend);
        }

        if vault.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        if vault.retry.retry_delay_ms >= vault.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                vault.retry.retry_delay_ms,
                vault.retry.max_backoff_ms,
            ));
        }

        // One overlay per configured profile, or the default profile
        let overlays = config.application.profiles.len().max(1);
        let lowest = i64::try_from(overlays)
            .map_or(i64::MIN, |overlays| i64::from(vault.max_priority).saturating_sub(overlays));
        if lowest < i64::from(i32::MIN) {
            return Err(ConfigError::MaxPriorityTooLow {
                max_priority: vault.max_priority,
                overlays,
            });
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}
