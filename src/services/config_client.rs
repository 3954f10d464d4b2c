//! Host-facing facade that plans and aggregates an application's configuration.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::errors::AggregationResult;
use crate::domain::models::{AggregationPlan, Config, PropertySource};
use crate::domain::ports::RemoteFetcher;
use crate::services::aggregator::{AggregatorConfig, ConfigAggregator};
use crate::services::target_planner::TargetPlanner;

/// Host-facing entry point: plans the fetch targets for the configured
/// application and profiles, then aggregates them into property sources
pub struct VaultConfigClient<F: RemoteFetcher + 'static> {
    config: Config,
    planner: TargetPlanner,
    aggregator: ConfigAggregator<F>,
}

impl<F: RemoteFetcher + 'static> VaultConfigClient<F> {
    /// Create a client from the loaded configuration and a fetcher
    pub fn new(config: Config, fetcher: Arc<F>) -> Self {
        let planner = TargetPlanner::new(config.vault.backend.clone());
        let aggregator = ConfigAggregator::new(
            fetcher,
            AggregatorConfig {
                fail_fast: config.vault.fail_fast,
                max_priority: config.vault.max_priority,
            },
        );
        Self {
            config,
            planner,
            aggregator,
        }
    }

    /// Configuration this client was built from
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Description of the underlying fetcher
    pub fn description(&self) -> &str {
        self.aggregator.fetcher().description()
    }

    /// Plan for the configured application and profiles
    pub fn plan(&self) -> AggregationPlan {
        self.planner.plan(
            &self.config.application.name,
            self.config.application.profiles.as_slice(),
        )
    }

    /// Fetch and merge all property sources
    ///
    /// Returns an empty list without any network access when the client is
    /// disabled.
    #[instrument(skip(self), fields(application = %self.config.application.name))]
    pub async fn property_sources(&self) -> AggregationResult<Vec<PropertySource>> {
        if !self.config.vault.enabled {
            info!("Vault configuration client disabled; no property sources fetched");
            return Ok(Vec::new());
        }

        info!(
            endpoint = %self.config.vault.uri,
            kv_version = %self.config.vault.kv_version,
            backend = %self.config.vault.backend,
            "Vault server endpoint"
        );
        info!(
            profiles = ?self.config.application.profiles,
            fail_fast = self.config.vault.fail_fast,
            "Application profiles"
        );

        let plan = self.plan();
        self.aggregator.aggregate(&plan).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::FetchError;
    use crate::domain::models::{FetchTarget, RemoteEnvelope};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RemoteFetcher for CountingFetcher {
        async fn fetch(&self, target: &FetchTarget) -> Result<RemoteEnvelope, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RemoteEnvelope::with_data(
                json!({ "source": target.name }).as_object().cloned().unwrap_or_default(),
            ))
        }

        fn description(&self) -> &str {
            "counting"
        }
    }

    fn config(enabled: bool) -> Config {
        let mut config = Config::default();
        config.application.name = "orders".to_string();
        config.application.profiles = vec!["prod".to_string()];
        config.vault.enabled = enabled;
        config.vault.max_priority = 50;
        config
    }

    #[tokio::test]
    async fn test_disabled_client_fetches_nothing() {
        let fetcher = Arc::new(CountingFetcher::default());
        let client = VaultConfigClient::new(config(false), Arc::clone(&fetcher));

        let sources = client.property_sources().await.unwrap();
        assert!(sources.is_empty());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_enabled_client_uses_configured_policy() {
        let fetcher = Arc::new(CountingFetcher::default());
        let client = VaultConfigClient::new(config(true), Arc::clone(&fetcher));

        assert_eq!(client.description(), "counting");
        let sources = client.property_sources().await.unwrap();
        let pairs: Vec<_> = sources.iter().map(|s| (s.name.as_str(), s.priority)).collect();
        assert_eq!(pairs, vec![("orders", 49), ("orders/prod", 50)]);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }
}
