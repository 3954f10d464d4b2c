//! Named, prioritized property bundles handed to the host resolver.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named key/value bundle with an override priority.
///
/// Higher priority wins when the host resolves colliding keys. Sources
/// produced by one aggregation are ordered by ascending priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySource {
    /// Source name (the fetch target name)
    pub name: String,
    /// Properties as returned by the store
    pub properties: Map<String, Value>,
    /// Override priority
    pub priority: i32,
}

impl PropertySource {
    /// Create a property source.
    pub fn new(name: impl Into<String>, properties: Map<String, Value>, priority: i32) -> Self {
        Self {
            name: name.into(),
            properties,
            priority,
        }
    }

    /// Look up a key, nested-key aware.
    ///
    /// The literal key is tried first; otherwise the key is split on `.` and
    /// walked through nested objects, so `db.url` matches both
    /// `{"db.url": ..}` and `{"db": {"url": ..}}`.
    ///
    /// ```
    /// use serde_json::json;
    /// use vault_config::domain::models::PropertySource;
    ///
    /// let properties = json!({"db": {"url": "jdbc:x"}, "timeout": "30"});
    /// let source = PropertySource::new("orders", properties.as_object().unwrap().clone(), 1);
    /// assert_eq!(source.get("db.url"), Some(&json!("jdbc:x")));
    /// assert_eq!(source.get("timeout"), Some(&json!("30")));
    /// assert_eq!(source.get("db.user"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.properties.get(key) {
            return Some(value);
        }

        let mut segments = key.split('.');
        let mut current = self.properties.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Top-level key names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Number of top-level properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// True when the source holds no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
