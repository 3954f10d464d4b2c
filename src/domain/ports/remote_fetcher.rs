use crate::domain::errors::FetchError;
use crate::domain::models::{FetchTarget, RemoteEnvelope};
use async_trait::async_trait;
use std::sync::Arc;

/// Port for reading one configuration fragment from the remote store
///
/// Implementations own the transport concerns: request construction,
/// authentication, retry/backoff, timeouts and envelope decoding. The
/// aggregator calls `fetch` once per planned target, concurrently, with no
/// ordering contract between calls.
///
/// # Examples
///
/// ```no_run
/// use vault_config::domain::models::FetchTarget;
/// use vault_config::domain::ports::RemoteFetcher;
///
/// async fn example(fetcher: &dyn RemoteFetcher, target: &FetchTarget) {
///     match fetcher.fetch(target).await {
///         Ok(envelope) => println!("{} keys", envelope.data.len()),
///         Err(err) if err.is_not_found() => println!("nothing at {target}"),
///         Err(err) => eprintln!("{err}"),
///     }
/// }
/// ```
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Fetch the envelope stored for `target`
    ///
    /// # Returns
    ///
    /// * `Ok(RemoteEnvelope)` - The decoded envelope (its data may be empty)
    /// * `Err(FetchError::NotFound)` - The store has nothing at this path
    /// * `Err(_)` - Any other transport or decoding failure
    async fn fetch(&self, target: &FetchTarget) -> Result<RemoteEnvelope, FetchError>;

    /// Short human-readable identifier of this fetcher
    fn description(&self) -> &str;
}

#[async_trait]
impl<T: RemoteFetcher + ?Sized> RemoteFetcher for Arc<T> {
    async fn fetch(&self, target: &FetchTarget) -> Result<RemoteEnvelope, FetchError> {
        (**self).fetch(target).await
    }

    fn description(&self) -> &str {
        (**self).description()
    }
}
