//! Vault KV response envelopes.
//!
//! Both engine versions share the outer envelope (lease and request
//! metadata); they differ in what `data` holds. KV v1 returns the secret
//! map directly, KV v2 nests it one level deeper next to version metadata.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::domain::models::RemoteEnvelope;

/// Extracts the configuration properties from a version-specific payload
pub trait ExtractData {
    /// Consume the payload and return its properties
    fn extract_data(self) -> Map<String, Value>;
}

impl ExtractData for Map<String, Value> {
    fn extract_data(self) -> Map<String, Value> {
        self
    }
}

/// Outer envelope shared by every Vault read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultResponse<T> {
    /// Version-specific payload
    #[serde(default = "Option::default")]
    pub data: Option<T>,

    /// Lease duration in seconds
    #[serde(default)]
    pub lease_duration: Option<u64>,

    /// Lease identifier (empty string when no lease)
    #[serde(default)]
    pub lease_id: Option<String>,

    /// Request identifier
    #[serde(default)]
    pub request_id: Option<String>,

    /// Response-wrapping information
    #[serde(default)]
    pub wrap_info: Option<HashMap<String, String>>,

    /// Whether the lease is renewable
    #[serde(default)]
    pub renewable: bool,

    /// Warnings attached by the server
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
}

/// KV v1 read: `data` is the secret map itself
pub type VaultResponseV1 = VaultResponse<Map<String, Value>>;

/// KV v2 read: `data` wraps the secret map and its version metadata
pub type VaultResponseV2 = VaultResponse<VaultResponseData>;

/// Payload of a KV v2 read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultResponseData {
    /// Secret properties; `null` for a deleted version
    #[serde(default)]
    pub data: Option<Map<String, Value>>,

    /// Version metadata (created_time, version, deletion_time, ...)
    #[serde(default, alias = "source")]
    pub metadata: Option<Map<String, Value>>,
}

impl ExtractData for VaultResponseData {
    fn extract_data(self) -> Map<String, Value> {
        self.data.unwrap_or_default()
    }
}

impl<T: ExtractData + DeserializeOwned> VaultResponse<T> {
    /// Convert into the version-agnostic envelope used by the aggregator
    pub fn into_envelope(self) -> RemoteEnvelope {
        RemoteEnvelope {
            data: self.data.map(ExtractData::extract_data).unwrap_or_default(),
            lease_duration: self
                .lease_duration
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            lease_id: self.lease_id.filter(|id| !id.is_empty()),
            request_id: self.request_id.filter(|id| !id.is_empty()),
            renewable: self.renewable,
            warnings: self.warnings.unwrap_or_default(),
            wrap_info: self.wrap_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_v1_envelope() {
        let body = json!({
            "request_id": "f2b5c1a4-0000-0000-0000-000000000001",
            "lease_id": "",
            "renewable": false,
            "lease_duration": 2_764_800,
            "data": {"db.url": "jdbc:postgresql://db/orders", "pool": {"size": 10}},
            "wrap_info": null,
            "warnings": null,
            "auth": null
        });

        let response: VaultResponseV1 = serde_json::from_value(body).unwrap();
        let envelope = response.into_envelope();

        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.data["pool"], json!({"size": 10}));
        assert_eq!(envelope.lease_duration, Some(Duration::from_secs(2_764_800)));
        assert_eq!(envelope.lease_id, None);
        assert_eq!(
            envelope.request_id.as_deref(),
            Some("f2b5c1a4-0000-0000-0000-000000000001")
        );
        assert!(envelope.warnings.is_empty());
        assert!(!envelope.renewable);
    }

    #[test]
    fn test_v2_envelope_unwraps_nested_data() {
        let body = json!({
            "request_id": "req-2",
            "lease_id": "",
            "renewable": false,
            "lease_duration": 0,
            "data": {
                "data": {"timeout": "30"},
                "metadata": {"created_time": "2024-01-01T00:00:00Z", "version": 3}
            },
            "warnings": ["deprecated path"]
        });

        let response: VaultResponseV2 = serde_json::from_value(body).unwrap();
        assert_eq!(
            response.data.as_ref().and_then(|d| d.metadata.as_ref()).map(|m| m["version"].clone()),
            Some(json!(3))
        );

        let envelope = response.into_envelope();
        assert_eq!(envelope.data["timeout"], json!("30"));
        assert_eq!(envelope.lease_duration, None);
        assert_eq!(envelope.warnings, vec!["deprecated path"]);
    }

    #[test]
    fn test_v2_deleted_version_has_no_data() {
        let body = json!({
            "data": {"data": null, "metadata": {"deletion_time": "2024-02-01T00:00:00Z"}}
        });
        let response: VaultResponseV2 = serde_json::from_value(body).unwrap();
        assert!(response.into_envelope().is_empty());
    }

    #[test]
    fn test_missing_data_is_empty() {
        let response: VaultResponseV1 = serde_json::from_value(json!({"warnings": []})).unwrap();
        assert!(response.into_envelope().is_empty());
    }
}
