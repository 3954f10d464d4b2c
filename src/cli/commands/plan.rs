//! Implementation of the `vault-config plan` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::output::table::PlanRow;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::cli::types::TargetArgs;
use crate::domain::models::{Config, KvVersion};
use crate::services::{PriorityAssigner, TargetPlanner};

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Debug, Serialize)]
pub struct PlannedTarget {
    pub name: String,
    pub request_path: String,
    pub priority: i32,
}

#[derive(Debug, Serialize)]
pub struct PlanOutput {
    pub application: String,
    pub kv_version: KvVersion,
    pub endpoint: String,
    /// Plan order: lowest priority first
    pub targets: Vec<PlannedTarget>,
}

impl PlanOutput {
    /// Plan the targets for `config` without touching the network
    ///
    /// # Errors
    /// Returns an error if the plan has no room for distinct priorities
    pub fn from_config(config: &Config) -> Result<Self> {
        let planner = TargetPlanner::new(config.vault.backend.clone());
        let plan = planner.plan(
            &config.application.name,
            config.application.profiles.as_slice(),
        );
        let priorities = PriorityAssigner::new(config.vault.max_priority)
            .priorities(plan.len())
            .with_context(|| {
                format!(
                    "Cannot rank {} targets below max priority {}",
                    plan.len(),
                    config.vault.max_priority
                )
            })?;

        let targets = plan
            .iter()
            .zip(priorities)
            .map(|(target, priority)| PlannedTarget {
                name: target.name.clone(),
                request_path: target.path.request_path(config.vault.kv_version),
                priority,
            })
            .collect();

        Ok(Self {
            application: config.application.name.clone(),
            kv_version: config.vault.kv_version,
            endpoint: config.vault.uri.clone(),
            targets,
        })
    }
}

impl CommandOutput for PlanOutput {
    fn to_human(&self) -> String {
        let rows: Vec<PlanRow<'_>> = self
            .targets
            .iter()
            .map(|target| PlanRow {
                name: &target.name,
                request_path: target.request_path.clone(),
                priority: target.priority,
            })
            .collect();

        format!(
            "Plan for '{}' against {} (kv {})\n{}",
            self.application,
            self.endpoint,
            self.kv_version,
            TableFormatter::new().format_plan(&rows)
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[allow(clippy::unused_async)]
pub async fn execute(args: PlanArgs, mut config: Config, json_mode: bool) -> Result<()> {
    args.target.apply(&mut config);
    output(&PlanOutput::from_config(&config)?, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_output_default_profile() {
        let mut config = Config::default();
        config.application.name = "orders".to_string();
        config.vault.max_priority = 100;
        config.vault.kv_version = KvVersion::V2;

        let plan = PlanOutput::from_config(&config).unwrap();
        let names: Vec<_> = plan.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["orders", "orders/development"]);
        assert_eq!(plan.targets[0].request_path, "/v1/secret/data/orders");
        assert_eq!(plan.targets[0].priority, 99);
        assert_eq!(plan.targets[1].priority, 100);

        let json = plan.to_json();
        assert_eq!(json["kv_version"], "v2");
        assert_eq!(json["targets"][1]["request_path"], "/v1/secret/data/orders/development");
    }

    #[test]
    fn test_plan_output_rejects_priority_underflow() {
        let mut config = Config::default();
        config.application.name = "orders".to_string();
        config.application.profiles = vec!["prod".to_string(), "eu".to_string()];
        config.vault.max_priority = i32::MIN + 1;

        let err = PlanOutput::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("Cannot rank 3 targets"));
    }
}
