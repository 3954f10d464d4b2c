//! Common test utilities for integration tests
//!
//! Provides in-memory `RemoteFetcher` fakes with per-target delays so tests
//! can control the order in which fetches complete.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use vault_config::{FetchError, FetchTarget, RemoteEnvelope, RemoteFetcher};

/// Scripted response for one target
#[derive(Clone)]
pub struct Scripted {
    pub delay: Duration,
    pub response: Result<RemoteEnvelope, FetchError>,
}

/// Fetcher that answers from a script keyed by target name, after a
/// per-target delay. Unknown targets answer `NotFound` immediately.
#[derive(Default)]
pub struct DelayedFetcher {
    script: HashMap<String, Scripted>,
    calls: AtomicUsize,
    completed: Mutex<Vec<String>>,
}

impl DelayedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `name` with `data` after `delay_ms`
    pub fn with_data(mut self, name: &str, delay_ms: u64, data: Value) -> Self {
        self.script.insert(
            name.to_string(),
            Scripted {
                delay: Duration::from_millis(delay_ms),
                response: Ok(envelope(data)),
            },
        );
        self
    }

    /// Answer `name` with `error` after `delay_ms`
    pub fn with_error(mut self, name: &str, delay_ms: u64, error: FetchError) -> Self {
        self.script.insert(
            name.to_string(),
            Scripted {
                delay: Duration::from_millis(delay_ms),
                response: Err(error),
            },
        );
        self
    }

    /// Number of fetches started
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Target names whose fetch ran to completion, in completion order
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RemoteFetcher for DelayedFetcher {
    async fn fetch(&self, target: &FetchTarget) -> Result<RemoteEnvelope, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let Some(scripted) = self.script.get(&target.name).cloned() else {
            return Err(FetchError::NotFound {
                path: target.path.secret_path(),
            });
        };

        tokio::time::sleep(scripted.delay).await;
        if let Ok(mut completed) = self.completed.lock() {
            completed.push(target.name.clone());
        }
        scripted.response
    }

    fn description(&self) -> &str {
        "delayed-test-fetcher"
    }
}

/// Envelope carrying the properties of a JSON object
pub fn envelope(data: Value) -> RemoteEnvelope {
    RemoteEnvelope::with_data(data.as_object().cloned().unwrap_or_default())
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
