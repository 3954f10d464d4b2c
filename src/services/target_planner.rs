//! Builds the ordered fetch plan for an application and its profiles.

use crate::domain::models::{AggregationPlan, FetchTarget, PathSpec};
use tracing::debug;

/// Profile planned when the caller supplies no active profiles.
pub const DEFAULT_PROFILE: &str = "development";

/// Service that turns an application name and its active profiles into an
/// ordered [`AggregationPlan`]
///
/// The plan always starts with the application-wide target, followed by one
/// target per distinct active profile in the order supplied. Later targets
/// override earlier ones.
#[derive(Debug, Clone)]
pub struct TargetPlanner {
    backend: String,
}

impl TargetPlanner {
    /// Create a planner for the given secret engine mount point
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
        }
    }

    /// Build the plan for `application` and its active `profiles`
    ///
    /// - No usable profiles: plans [`DEFAULT_PROFILE`].
    /// - A profile equal to the application name is the base target and is
    ///   not planned twice; repeated profiles keep their first position.
    /// - Blank profile names are ignored.
    ///
    /// ```
    /// use vault_config::services::TargetPlanner;
    ///
    /// let plan = TargetPlanner::new("secret").plan("orders", &["prod"]);
    /// let names: Vec<_> = plan.iter().map(|t| t.name.as_str()).collect();
    /// assert_eq!(names, vec!["orders", "orders/prod"]);
    /// ```
    pub fn plan<S: AsRef<str>>(&self, application: &str, profiles: &[S]) -> AggregationPlan {
        let mut active: Vec<&str> = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let profile = profile.as_ref().trim();
            if profile.is_empty() || active.contains(&profile) {
                continue;
            }
            active.push(profile);
        }
        if active.is_empty() {
            active.push(DEFAULT_PROFILE);
        }

        let base = FetchTarget {
            name: application.to_string(),
            path: self.path_spec(application, None),
        };
        let overlays: Vec<FetchTarget> = active
            .into_iter()
            .filter(|profile| *profile != application)
            .map(|profile| FetchTarget {
                name: format!("{application}/{profile}"),
                path: self.path_spec(application, Some(profile)),
            })
            .collect();

        let plan = AggregationPlan::from_base(base, overlays);
        debug!(
            application,
            backend = %self.backend,
            targets = plan.len(),
            "planned fetch targets"
        );
        plan
    }

    fn path_spec(&self, application: &str, profile: Option<&str>) -> PathSpec {
        PathSpec {
            backend: self.backend.clone(),
            application: application.to_string(),
            profile: profile.map(ToString::to_string),
        }
    }
}
