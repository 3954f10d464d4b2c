//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML file loading
//! - `VAULT_ADDR` / `VAULT_TOKEN` and `VAULT_CONFIG_*` overrides
//! - Configuration validation

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
