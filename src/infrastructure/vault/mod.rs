//! Vault HTTP integration
//!
//! Reads property sources from a key/value secret engine:
//! - KV v1 and v2 path layouts and response envelopes
//! - Exponential backoff retry for transient errors

pub mod client;
pub mod retry;
pub mod types;

pub use client::{VaultHttpClient, CLIENT_DESCRIPTION_V1, CLIENT_DESCRIPTION_V2};
pub use retry::RetryPolicy;
pub use types::{ExtractData, VaultResponse, VaultResponseData, VaultResponseV1, VaultResponseV2};
