//! Plan-position priorities and the final merge of property sources.
//!
//! Priorities are computed from a target's index in the plan before any
//! fetch is dispatched, so two runs over identical data rank sources the
//! same way no matter which response arrives first.

use crate::domain::errors::AggregationResult;
use crate::domain::models::{FetchOutcome, FetchTarget, PropertySource};
use tracing::info;

/// Assigns override priorities by plan position and turns outcomes into
/// property sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityAssigner {
    max_priority: i32,
}

impl Default for PriorityAssigner {
    fn default() -> Self {
        Self::new(i32::MAX)
    }
}

impl PriorityAssigner {
    /// Create an assigner whose last plan entry receives `max_priority`
    pub const fn new(max_priority: i32) -> Self {
        Self { max_priority }
    }

    /// Highest priority handed out
    pub const fn max_priority(&self) -> i32 {
        self.max_priority
    }

    /// Priority of plan index `index` in a plan of `len` targets
    ///
    /// Formula: `max_priority - (len - 1 - index)`. The first target gets the
    /// lowest priority, the last the highest. Returns `None` when the result
    /// would fall below `i32::MIN`.
    ///
    /// ```
    /// use vault_config::services::PriorityAssigner;
    ///
    /// let assigner = PriorityAssigner::new(100);
    /// assert_eq!(assigner.priority_for(0, 3), Some(98));
    /// assert_eq!(assigner.priority_for(2, 3), Some(100));
    /// assert_eq!(PriorityAssigner::new(i32::MIN).priority_for(0, 2), None);
    /// ```
    pub fn priority_for(&self, index: usize, len: usize) -> Option<i32> {
        debug_assert!(index < len, "plan index {index} out of bounds for {len} targets");
        let distance = len.saturating_sub(1).saturating_sub(index);
        i32::try_from(distance)
            .ok()
            .and_then(|distance| self.max_priority.checked_sub(distance))
    }

    /// Priorities for every index of a plan of `len` targets, in plan order
    ///
    /// Returns `None` if the plan is too long for every target to get a
    /// distinct priority at or below `max_priority`.
    pub fn priorities(&self, len: usize) -> Option<Vec<i32>> {
        (0..len).map(|index| self.priority_for(index, len)).collect()
    }

    /// Convert one outcome into at most one property source
    ///
    /// # Returns
    ///
    /// * `Ok(Some(_))` - `Success` with non-empty data
    /// * `Ok(None)` - `Empty`, or `Success` with empty data
    /// * `Err(_)` - `Fatal`; nothing may be emitted for this target
    pub fn assign(
        &self,
        target: &FetchTarget,
        outcome: FetchOutcome,
        priority: i32,
    ) -> AggregationResult<Option<PropertySource>> {
        match outcome {
            FetchOutcome::Fatal(err) => Err(err),
            FetchOutcome::Empty => Ok(None),
            FetchOutcome::Success(envelope) if envelope.is_empty() => Ok(None),
            FetchOutcome::Success(envelope) => {
                info!(
                    source = %target.name,
                    priority,
                    keys = envelope.data.len(),
                    "Obtained property source from Vault"
                );
                Ok(Some(PropertySource::new(
                    target.name.clone(),
                    envelope.data,
                    priority,
                )))
            }
        }
    }

    /// Merge per-target results, given in plan order, into the final sequence
    pub fn merge(slots: Vec<Option<PropertySource>>) -> Vec<PropertySource> {
        let sources: Vec<PropertySource> = slots.into_iter().flatten().collect();
        debug_assert!(
            sources.windows(2).all(|pair| pair[0].priority < pair[1].priority),
            "property sources must be in plan order"
        );
        sources
    }
}
