//! Domain layer for vault-config
//!
//! This module contains the aggregation data model, its errors and the
//! ports that infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{AggregationError, AggregationResult, FetchError};
