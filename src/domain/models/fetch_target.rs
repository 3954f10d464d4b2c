//! Fetch targets and the aggregation plan built from them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::KvVersion;

/// Parameters of one remote read: secret engine, application and optional profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSpec {
    /// Secret engine mount point
    pub backend: String,
    /// Application name
    pub application: String,
    /// Profile segment; `None` addresses the application-wide secret
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

impl PathSpec {
    /// Secret path relative to the engine mount: `app` or `app/profile`.
    pub fn secret_path(&self) -> String {
        match &self.profile {
            Some(profile) => format!("{}/{}", self.application, profile),
            None => self.application.clone(),
        }
    }

    /// HTTP request path for the given engine version.
    ///
    /// ```
    /// use vault_config::domain::models::{KvVersion, PathSpec};
    ///
    /// let spec = PathSpec {
    ///     backend: "secret".to_string(),
    ///     application: "orders".to_string(),
    ///     profile: Some("prod".to_string()),
    /// };
    /// assert_eq!(spec.request_path(KvVersion::V1), "/v1/secret/orders/prod");
    /// assert_eq!(spec.request_path(KvVersion::V2), "/v1/secret/data/orders/prod");
    /// ```
    pub fn request_path(&self, version: KvVersion) -> String {
        match version {
            KvVersion::V1 => format!("/v1/{}/{}", self.backend, self.secret_path()),
            KvVersion::V2 => format!("/v1/{}/data/{}", self.backend, self.secret_path()),
        }
    }
}

/// One named remote source to fetch. Immutable once planned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchTarget {
    /// Property source name this fetch will produce
    pub name: String,
    /// Where to read it from
    pub path: PathSpec,
}

impl FetchTarget {
    /// True for the application-wide target without a profile segment.
    pub const fn is_base(&self) -> bool {
        self.path.profile.is_none()
    }
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Ordered, non-empty list of fetch targets. Position in the plan decides
/// override priority: later entries win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationPlan {
    targets: Vec<FetchTarget>,
}

impl AggregationPlan {
    /// Wrap an ordered target list. Returns `None` for an empty list.
    pub fn new(targets: Vec<FetchTarget>) -> Option<Self> {
        if targets.is_empty() {
            None
        } else {
            Some(Self { targets })
        }
    }

    /// Plan with `base` first followed by `overlays` in order.
    pub fn from_base(base: FetchTarget, overlays: Vec<FetchTarget>) -> Self {
        let mut targets = Vec::with_capacity(overlays.len() + 1);
        targets.push(base);
        targets.extend(overlays);
        Self { targets }
    }

    /// Number of targets (always at least one).
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Target at a plan index.
    pub fn get(&self, index: usize) -> Option<&FetchTarget> {
        self.targets.get(index)
    }

    /// Iterate over targets in plan order.
    pub fn iter(&self) -> std::slice::Iter<'_, FetchTarget> {
        self.targets.iter()
    }
}

impl<'a> IntoIterator for &'a AggregationPlan {
    type Item = &'a FetchTarget;
    type IntoIter = std::slice::Iter<'a, FetchTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}
