//! Fan-in join over the concurrent fetches of one aggregation.
//!
//! Each fetch task reports exactly once, either a resolved value for its
//! plan index or a fatal error. The tracker fulfils a single-assignment
//! result cell when the last slot is filled, or immediately on the first
//! fatal error. Reports arriving after that are discarded.

use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, trace};

use crate::domain::errors::{AggregationError, AggregationResult};

/// What the tracker did with one report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Stored; other slots are still pending
    Accepted,
    /// Stored and it was the last one; the result cell is now fulfilled
    Completed,
    /// The first fatal error; the result cell now holds it
    Aborted,
    /// The slot was already filled; the report was not counted
    Duplicate,
    /// The index does not belong to this aggregation
    OutOfRange,
    /// The result cell was already fulfilled; the report was dropped
    Discarded,
}

struct TrackerState<T> {
    slots: Vec<Option<T>>,
    resolved: usize,
    result_tx: Option<oneshot::Sender<AggregationResult<Vec<T>>>>,
}

/// Mutex-guarded completion counter with a single-assignment result cell
pub struct CompletionTracker<T> {
    expected: usize,
    state: Mutex<TrackerState<T>>,
}

/// Receiving side of the tracker's result cell
pub struct CompletionHandle<T> {
    result_rx: oneshot::Receiver<AggregationResult<Vec<T>>>,
}

impl<T: Send + 'static> CompletionTracker<T> {
    /// Create a tracker expecting `expected` reports
    ///
    /// A tracker expecting zero reports is complete immediately.
    pub fn new(expected: usize) -> (Arc<Self>, CompletionHandle<T>) {
        let (result_tx, result_rx) = oneshot::channel();
        let mut slots = Vec::with_capacity(expected);
        slots.resize_with(expected, || None);

        let result_tx = if expected == 0 {
            let _ = result_tx.send(Ok(Vec::new()));
            None
        } else {
            Some(result_tx)
        };

        let tracker = Arc::new(Self {
            expected,
            state: Mutex::new(TrackerState {
                slots,
                resolved: 0,
                result_tx,
            }),
        });
        (tracker, CompletionHandle { result_rx })
    }

    /// Record the resolved value for plan index `index`
    pub async fn resolve(&self, index: usize, value: T) -> Delivery {
        let mut state = self.state.lock().await;

        if state.result_tx.is_none() {
            trace!(index, "discarding report after completion");
            return Delivery::Discarded;
        }
        let Some(slot) = state.slots.get_mut(index) else {
            return Delivery::OutOfRange;
        };
        if slot.is_some() {
            debug!(index, "ignoring duplicate report");
            return Delivery::Duplicate;
        }

        *slot = Some(value);
        state.resolved += 1;
        trace!(index, resolved = state.resolved, expected = self.expected, "slot resolved");

        if state.resolved < self.expected {
            return Delivery::Accepted;
        }

        let slots = std::mem::take(&mut state.slots);
        if let Some(tx) = state.result_tx.take() {
            let _ = tx.send(Ok(slots.into_iter().flatten().collect()));
        }
        Delivery::Completed
    }

    /// Fail the whole aggregation with `error`
    ///
    /// Only the first fatal error is kept; resolved slots are dropped.
    pub async fn abort(&self, error: AggregationError) -> Delivery {
        let mut state = self.state.lock().await;

        let Some(tx) = state.result_tx.take() else {
            trace!(target_name = error.target(), "discarding fatal error after completion");
            return Delivery::Discarded;
        };
        debug!(
            target_name = error.target(),
            resolved = state.resolved,
            expected = self.expected,
            "aborting aggregation"
        );
        state.slots.clear();
        let _ = tx.send(Err(error));
        Delivery::Aborted
    }

    /// True once the result cell has been fulfilled
    pub async fn is_finished(&self) -> bool {
        self.state.lock().await.result_tx.is_none()
    }

    /// Number of slots resolved so far
    pub async fn resolved(&self) -> usize {
        self.state.lock().await.resolved
    }
}

impl<T> CompletionHandle<T> {
    /// Wait for the tracker's result: every slot in index order, or the
    /// first fatal error
    pub async fn wait(self) -> AggregationResult<Vec<T>> {
        self.result_rx
            .await
            .unwrap_or_else(|_| {
                Err(AggregationError::TaskFailed {
                    target: "*".to_string(),
                    reason: "completion tracker dropped before all targets resolved".to_string(),
                })
            })
    }
}
