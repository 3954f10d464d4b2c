//! Implementation of the `vault-config fetch` command.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::cli::output::{output, CommandOutput, TableFormatter, MASKED_VALUE};
use crate::cli::types::TargetArgs;
use crate::domain::models::{Config, PropertySource};
use crate::infrastructure::vault::VaultHttpClient;
use crate::services::VaultConfigClient;

#[derive(Args, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Fail when any property source is missing
    #[arg(long)]
    pub fail_fast: bool,

    /// Print property values instead of masking them
    #[arg(long)]
    pub reveal: bool,
}

#[derive(Debug, Serialize)]
pub struct SourceView {
    pub name: String,
    pub priority: i32,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct FetchOutput {
    pub application: String,
    pub profiles: Vec<String>,
    pub client: String,
    pub fetched_at: DateTime<Utc>,
    /// Highest priority first
    pub sources: Vec<SourceView>,
    #[serde(skip)]
    merged: Vec<PropertySource>,
    #[serde(skip)]
    reveal: bool,
}

impl FetchOutput {
    fn new(config: &Config, client: &str, sources: Vec<PropertySource>, reveal: bool) -> Self {
        let views = sources
            .iter()
            .rev()
            .map(|source| SourceView {
                name: source.name.clone(),
                priority: source.priority,
                properties: if reveal {
                    source.properties.clone()
                } else {
                    mask(&source.properties)
                },
            })
            .collect();

        Self {
            application: config.application.name.clone(),
            profiles: config.application.profiles.clone(),
            client: client.to_string(),
            fetched_at: Utc::now(),
            sources: views,
            merged: sources,
            reveal,
        }
    }
}

impl CommandOutput for FetchOutput {
    fn to_human(&self) -> String {
        if self.sources.is_empty() {
            return format!("No property sources found for '{}'", self.application);
        }

        let mut lines = vec![format!(
            "{} property source(s) for '{}' via {}",
            self.sources.len(),
            self.application,
            self.client
        )];
        lines.push(
            TableFormatter::new()
                .reveal_values(self.reveal)
                .format_sources(&self.merged),
        );
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn mask(properties: &Map<String, Value>) -> Map<String, Value> {
    properties
        .keys()
        .map(|key| (key.clone(), Value::String(MASKED_VALUE.to_string())))
        .collect()
}

pub async fn execute(args: FetchArgs, mut config: Config, json_mode: bool) -> Result<()> {
    args.target.apply(&mut config);
    if args.fail_fast {
        config.vault.fail_fast = true;
    }

    let fetcher = Arc::new(VaultHttpClient::from_config(&config.vault)?);
    let client = VaultConfigClient::new(config, fetcher);

    let sources = client
        .property_sources()
        .await
        .context("Failed to load property sources from Vault")?;

    let output_data = FetchOutput::new(client.config(), client.description(), sources, args.reveal);
    output(&output_data, json_mode);
    Ok(())
}
