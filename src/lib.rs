//! vault-config - Layered configuration from Vault
//!
//! vault-config reads an application's configuration from a Vault key/value
//! secret engine. The application-wide secret and one secret per active
//! profile are fetched concurrently and merged into an ordered list of
//! property sources, where later (more specific) sources carry a higher
//! priority and override earlier ones.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Plans, envelopes, property sources and the `RemoteFetcher` port
//! - **Service Layer** (`services`): Planning, error policy, fan-in tracking and aggregation
//! - **Infrastructure Layer** (`infrastructure`): Vault HTTP client, configuration, logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vault_config::{ConfigLoader, VaultConfigClient, VaultHttpClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let fetcher = Arc::new(VaultHttpClient::from_config(&config.vault)?);
//!     let client = VaultConfigClient::new(config, fetcher);
//!
//!     for source in client.property_sources().await? {
//!         println!("{} (priority {})", source.name, source.priority);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{AggregationError, AggregationResult, FetchError};
pub use domain::models::{
    AggregationPlan, Config, FetchOutcome, FetchTarget, KvVersion, PathSpec, PropertySource,
    RemoteEnvelope, VaultConfig,
};
pub use domain::ports::RemoteFetcher;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::vault::VaultHttpClient;
pub use services::{ConfigAggregator, TargetPlanner, VaultConfigClient};
