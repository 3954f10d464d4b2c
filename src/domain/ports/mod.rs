//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - RemoteFetcher: reads one configuration fragment from the secret store
//!
//! These traits define the contracts that allow the aggregation core to be
//! independent of the HTTP transport.

pub mod remote_fetcher;

pub use remote_fetcher::RemoteFetcher;
