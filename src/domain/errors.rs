//! Domain errors for the vault-config aggregation core.

use thiserror::Error;

/// Errors raised by a [`RemoteFetcher`](crate::domain::ports::RemoteFetcher)
/// for a single fetch target.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The remote store holds no data at this path.
    #[error("No configuration found at {path}")]
    NotFound { path: String },

    /// Any non-success, non-404 status returned by the remote store.
    #[error("Remote store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection-level failure (DNS, refused, reset, TLS).
    #[error("Network error: {0}")]
    Network(String),

    /// Request did not complete in time.
    #[error("Timeout waiting for response")]
    Timeout,

    /// The response body could not be decoded into an envelope.
    #[error("Malformed response envelope: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Map an HTTP status code and response body to an error variant.
    ///
    /// 404 is the only status that means "no configuration here"; every
    /// other status is carried verbatim.
    ///
    /// # Examples
    ///
    /// ```
    /// use vault_config::domain::errors::FetchError;
    ///
    /// let error = FetchError::from_status(404, "/v1/secret/orders", String::new());
    /// assert!(error.is_not_found());
    ///
    /// let error = FetchError::from_status(503, "/v1/secret/orders", "sealed".to_string());
    /// assert!(error.is_transient());
    /// ```
    pub fn from_status(status: u16, path: &str, body: String) -> Self {
        match status {
            404 => Self::NotFound {
                path: path.to_string(),
            },
            _ => Self::Status { status, body },
        }
    }

    /// True when the remote store reported that nothing exists at the path.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the failure is worth retrying.
    ///
    /// Transient errors include rate limiting (429), server errors (5xx),
    /// network failures and timeouts.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Network(_) | Self::Timeout => true,
            Self::NotFound { .. } | Self::Malformed(_) => false,
        }
    }
}

/// Fatal errors that terminate a whole aggregation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AggregationError {
    /// A source was missing and `fail_fast` is set.
    #[error(
        "Could not locate PropertySource [{target}] and the fail fast property is set: {source}"
    )]
    NotFound {
        target: String,
        #[source]
        source: FetchError,
    },

    /// Any fetch failure other than "not found".
    #[error("Failed to fetch PropertySource [{target}]: {source}")]
    Transport {
        target: String,
        #[source]
        source: FetchError,
    },

    /// The task driving a fetch ended without reporting an outcome.
    #[error("Fetch task for PropertySource [{target}] failed: {reason}")]
    TaskFailed { target: String, reason: String },

    /// The plan holds more targets than there are distinct priorities at or
    /// below `max_priority`.
    #[error(
        "Cannot assign distinct priorities to {targets} property sources starting at [{target}] with max priority {max_priority}"
    )]
    PriorityRange {
        target: String,
        targets: usize,
        max_priority: i32,
    },
}

impl AggregationError {
    /// Name of the fetch target that triggered the failure.
    pub fn target(&self) -> &str {
        match self {
            Self::NotFound { target, .. }
            | Self::Transport { target, .. }
            | Self::TaskFailed { target, .. }
            | Self::PriorityRange { target, .. } => target,
        }
    }
}

/// Result type for aggregation operations.
pub type AggregationResult<T> = Result<T, AggregationError>;
