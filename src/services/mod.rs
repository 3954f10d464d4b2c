//! Aggregation services: planning, error policy, fan-in tracking, priority
//! assignment and the host-facing client.

pub mod aggregator;
pub mod completion_tracker;
pub mod config_client;
pub mod error_policy;
pub mod priority_assigner;
pub mod target_planner;

pub use aggregator::{AggregatorConfig, ConfigAggregator};
pub use completion_tracker::{CompletionHandle, CompletionTracker, Delivery};
pub use config_client::VaultConfigClient;
pub use error_policy::ErrorPolicy;
pub use priority_assigner::PriorityAssigner;
pub use target_planner::{TargetPlanner, DEFAULT_PROFILE};
