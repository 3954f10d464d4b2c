//! Concurrent fetch/merge aggregator.
//!
//! Every target of a plan is fetched on its own tokio task. Each task
//! classifies its own result, builds its own property source with the
//! priority precomputed for its plan index, and reports to the shared
//! [`CompletionTracker`]. The first fatal outcome fails the aggregation and
//! cancels the fetches still in flight.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::errors::{AggregationError, AggregationResult};
use crate::domain::models::{AggregationPlan, FetchTarget, PropertySource};
use crate::domain::ports::RemoteFetcher;
use crate::services::completion_tracker::{CompletionTracker, Delivery};
use crate::services::error_policy::ErrorPolicy;
use crate::services::priority_assigner::PriorityAssigner;

/// Aggregator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Abort when any source is missing
    pub fail_fast: bool,
    /// Priority of the last plan entry
    pub max_priority: i32,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            max_priority: i32::MAX,
        }
    }
}

/// Fans out one fetch per plan target and merges the results into an
/// ordered, prioritized list of property sources
pub struct ConfigAggregator<F: RemoteFetcher + 'static> {
    fetcher: Arc<F>,
    policy: ErrorPolicy,
    assigner: PriorityAssigner,
}

impl<F: RemoteFetcher + 'static> ConfigAggregator<F> {
    /// Create an aggregator over `fetcher`
    pub fn new(fetcher: Arc<F>, config: AggregatorConfig) -> Self {
        Self {
            fetcher,
            policy: ErrorPolicy::new(config.fail_fast),
            assigner: PriorityAssigner::new(config.max_priority),
        }
    }

    /// The fetcher this aggregator dispatches to
    pub fn fetcher(&self) -> &Arc<F> {
        &self.fetcher
    }

    /// Fetch every target of `plan` concurrently and merge the results
    ///
    /// # Returns
    ///
    /// * `Ok(sources)` - Sources in plan order (ascending priority); targets
    ///   that were missing or empty contribute nothing
    /// * `Err(_)` - The first fatal outcome; no partial result is returned
    pub async fn aggregate(&self, plan: &AggregationPlan) -> AggregationResult<Vec<PropertySource>> {
        let aggregation_id = Uuid::new_v4();
        let span = info_span!(
            "aggregation",
            %aggregation_id,
            fetcher = self.fetcher.description(),
            targets = plan.len(),
        );
        self.run(plan).instrument(span).await
    }

    async fn run(&self, plan: &AggregationPlan) -> AggregationResult<Vec<PropertySource>> {
        let started = Instant::now();
        let priorities = self.assigner.priorities(plan.len()).ok_or_else(|| {
            AggregationError::PriorityRange {
                target: plan.get(0).map(|t| t.name.clone()).unwrap_or_default(),
                targets: plan.len(),
                max_priority: self.assigner.max_priority(),
            }
        })?;
        let (tracker, handle) = CompletionTracker::<Option<PropertySource>>::new(plan.len());

        let mut tasks = JoinSet::new();
        for (index, (target, priority)) in plan.iter().zip(priorities).enumerate() {
            let span = info_span!("fetch", source = %target.name, index, priority);
            tasks.spawn(
                fetch_target(
                    Arc::clone(&self.fetcher),
                    target.clone(),
                    index,
                    priority,
                    self.policy,
                    self.assigner,
                    Arc::clone(&tracker),
                )
                .instrument(span),
            );
        }

        let result = handle.wait().await;
        match &result {
            Ok(sources) => {
                info!(
                    sources = sources.iter().flatten().count(),
                    elapsed_ms = started.elapsed().as_millis(),
                    "aggregation complete"
                );
            }
            Err(err) => {
                let cancelled = cancel_in_flight(&mut tasks).await;
                error!(
                    error = %err,
                    cancelled,
                    elapsed_ms = started.elapsed().as_millis(),
                    "aggregation failed"
                );
            }
        }

        result.map(PriorityAssigner::merge)
    }
}

/// Abort every task still running and count the ones that were cut short
async fn cancel_in_flight(tasks: &mut JoinSet<Delivery>) -> usize {
    tasks.abort_all();
    let mut cancelled = 0;
    while let Some(joined) = tasks.join_next().await {
        if joined.is_err_and(|err| err.is_cancelled()) {
            cancelled += 1;
        }
    }
    cancelled
}

async fn fetch_target<F: RemoteFetcher + 'static>(
    fetcher: Arc<F>,
    target: FetchTarget,
    index: usize,
    priority: i32,
    policy: ErrorPolicy,
    assigner: PriorityAssigner,
    tracker: Arc<CompletionTracker<Option<PropertySource>>>,
) -> Delivery {
    debug!(path = %target.path.secret_path(), "fetching property source");

    let result = match AssertUnwindSafe(fetcher.fetch(&target)).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(ToString::to_string)
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "fetch panicked".to_string());
            return tracker
                .abort(AggregationError::TaskFailed {
                    target: target.name.clone(),
                    reason,
                })
                .await;
        }
    };

    match &result {
        Ok(envelope) => debug!(keys = envelope.data.len(), "fetch succeeded"),
        Err(err) if err.is_not_found() => debug!(error = %err, "nothing stored at path"),
        Err(err) => warn!(error = %err, "fetch failed"),
    }

    let outcome = policy.classify(&target, result);
    let delivery = match assigner.assign(&target, outcome, priority) {
        Ok(source) => tracker.resolve(index, source).await,
        Err(err) => tracker.abort(err).await,
    };
    if delivery == Delivery::Discarded {
        debug!("result arrived after the aggregation finished; discarded");
    }
    delivery
}
