//! Maps raw fetch results onto success, tolerated-empty or fatal outcomes.

use crate::domain::errors::{AggregationError, FetchError};
use crate::domain::models::{FetchOutcome, FetchTarget, RemoteEnvelope};
use tracing::warn;

/// Classifies each raw fetch result as success, tolerated-empty or fatal
///
/// | result                | `fail_fast = false` | `fail_fast = true` |
/// |-----------------------|---------------------|--------------------|
/// | `Ok(envelope)`        | Success             | Success            |
/// | `Err(NotFound)`       | Empty               | Fatal              |
/// | any other `Err`       | Fatal               | Fatal              |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorPolicy {
    fail_fast: bool,
}

impl ErrorPolicy {
    /// Create a policy
    pub const fn new(fail_fast: bool) -> Self {
        Self { fail_fast }
    }

    /// Classify the result of fetching `target`
    pub fn classify(
        &self,
        target: &FetchTarget,
        result: Result<RemoteEnvelope, FetchError>,
    ) -> FetchOutcome {
        match result {
            Ok(envelope) => FetchOutcome::Success(envelope),
            Err(err) if err.is_not_found() => {
                if self.fail_fast {
                    FetchOutcome::Fatal(AggregationError::NotFound {
                        target: target.name.clone(),
                        source: err,
                    })
                } else {
                    warn!(target_name = %target.name, error = %err, "Could not locate PropertySource");
                    FetchOutcome::Empty
                }
            }
            Err(err) => FetchOutcome::Fatal(AggregationError::Transport {
                target: target.name.clone(),
                source: err,
            }),
        }
    }
}
