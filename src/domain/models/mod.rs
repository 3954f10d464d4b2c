pub mod config;
pub mod envelope;
pub mod fetch_target;
pub mod outcome;
pub mod property_source;

pub use config::{ApplicationConfig, Config, KvVersion, LoggingConfig, RetryConfig, VaultConfig};
pub use envelope::RemoteEnvelope;
pub use fetch_target::{AggregationPlan, FetchTarget, PathSpec};
pub use outcome::FetchOutcome;
pub use property_source::PropertySource;
