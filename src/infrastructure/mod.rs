//! Infrastructure layer module
//!
//! Adapters and ambient concerns:
//! - Vault HTTP client (the production `RemoteFetcher`)
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod logging;
pub mod vault;
