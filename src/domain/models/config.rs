use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Main configuration structure for vault-config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Application identity and active profiles
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Vault connection and aggregation policy
    #[serde(default)]
    pub vault: VaultConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Application identity used to plan fetch targets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ApplicationConfig {
    /// Application name; addresses the base (profile-less) secret path
    #[serde(default = "default_application_name")]
    pub name: String,

    /// Active profiles in override order (last wins)
    #[serde(default)]
    pub profiles: Vec<String>,
}

fn default_application_name() -> String {
    "application".to_string()
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_application_name(),
            profiles: Vec::new(),
        }
    }
}

/// Key/value secret engine version
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KvVersion {
    /// Flat key/value engine: `/v1/{backend}/{path}`
    #[default]
    V1,
    /// Versioned engine: `/v1/{backend}/data/{path}`
    V2,
}

impl fmt::Display for KvVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
        }
    }
}

/// Vault client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VaultConfig {
    /// When false, no property sources are fetched at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Vault server endpoint
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Client token sent as `X-Vault-Token`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Secret engine version
    #[serde(default)]
    pub kv_version: KvVersion,

    /// Secret engine mount point
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Abort the aggregation when any source is missing
    #[serde(default)]
    pub fail_fast: bool,

    /// Priority assigned to the last (most specific) property source
    #[serde(default = "default_max_priority")]
    pub max_priority: i32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry policy for transient failures
    #[serde(default)]
    pub retry: RetryConfig,
}

const fn default_true() -> bool {
    true
}

fn default_uri() -> String {
    "http://localhost:8200".to_string()
}

fn default_backend() -> String {
    "secret".to_string()
}

const fn default_max_priority() -> i32 {
    i32::MAX
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            uri: default_uri(),
            token: None,
            kv_version: KvVersion::default(),
            backend: default_backend(),
            fail_fast: false,
            max_priority: default_max_priority(),
            timeout_secs: default_timeout_secs(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Delay before the first retry in milliseconds; doubles per retry
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Upper bound for the backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_retry_count() -> u32 {
    3
}

const fn default_retry_delay_ms() -> u64 {
    1000
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.application.name, "application");
        assert!(config.application.profiles.is_empty());
        assert!(config.vault.enabled);
        assert_eq!(config.vault.uri, "http://localhost:8200");
        assert_eq!(config.vault.backend, "secret");
        assert_eq!(config.vault.kv_version, KvVersion::V1);
        assert!(!config.vault.fail_fast);
        assert_eq!(config.vault.max_priority, i32::MAX);
        assert_eq!(config.vault.retry.retry_count, 3);
        assert_eq!(config.vault.retry.retry_delay_ms, 1000);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r"
application:
  name: orders
  profiles: [prod, eu]
vault:
  kv_version: v2
  fail_fast: true
";
        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");
        assert_eq!(config.application.name, "orders");
        assert_eq!(config.application.profiles, vec!["prod", "eu"]);
        assert_eq!(config.vault.kv_version, KvVersion::V2);
        assert!(config.vault.fail_fast);
        assert_eq!(config.vault.backend, "secret");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_kv_version_display() {
        assert_eq!(KvVersion::V1.to_string(), "v1");
        assert_eq!(KvVersion::V2.to_string(), "v2");
    }
}
