use crate::domain::errors::AggregationError;

use super::envelope::RemoteEnvelope;

/// Classified result of fetching one target.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The store returned an envelope
    Success(RemoteEnvelope),
    /// Nothing at the path and the policy tolerates it
    Empty,
    /// The whole aggregation must fail
    Fatal(AggregationError),
}
