use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

/// Version-agnostic response envelope returned by a remote fetch.
///
/// Only `data` is interpreted by the aggregator; the lease descriptor and
/// the remaining metadata are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteEnvelope {
    /// Configuration properties; values may be nested objects
    pub data: Map<String, Value>,
    /// How long the returned values remain valid
    pub lease_duration: Option<Duration>,
    /// Lease identifier, if the store issued one
    pub lease_id: Option<String>,
    /// Request identifier assigned by the store
    pub request_id: Option<String>,
    /// Whether the lease can be renewed
    pub renewable: bool,
    /// Warnings emitted by the store
    pub warnings: Vec<String>,
    /// Response-wrapping information
    pub wrap_info: Option<HashMap<String, String>>,
}

impl RemoteEnvelope {
    /// Envelope carrying only data, with no lease information.
    pub fn with_data(data: Map<String, Value>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// True when the envelope carries no properties.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
