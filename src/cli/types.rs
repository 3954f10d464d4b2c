//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{config::ConfigArgs, fetch::FetchArgs, plan::PlanArgs};
use crate::domain::models::{Config, KvVersion};

#[derive(Parser, Debug)]
#[command(name = "vault-config")]
#[command(about = "Fetch layered application configuration from Vault", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this YAML file instead of .vault-config/
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch and merge property sources for an application
    Fetch(FetchArgs),

    /// Show the planned fetch targets without contacting Vault
    Plan(PlanArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Application and profile overrides shared by `fetch` and `plan`
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Application name (overrides application.name)
    #[arg(short, long)]
    pub app: Option<String>,

    /// Active profile, in override order; repeatable or comma-separated
    #[arg(short, long = "profile", value_delimiter = ',')]
    pub profiles: Vec<String>,

    /// Secret engine version (overrides vault.kv_version)
    #[arg(long, value_enum)]
    pub kv_version: Option<KvVersionArg>,

    /// Secret engine mount point (overrides vault.backend)
    #[arg(long)]
    pub backend: Option<String>,
}

impl TargetArgs {
    /// Apply the overrides that were given on the command line
    pub fn apply(&self, config: &mut Config) {
        if let Some(app) = &self.app {
            config.application.name.clone_from(app);
        }
        if !self.profiles.is_empty() {
            config.application.profiles.clone_from(&self.profiles);
        }
        if let Some(version) = self.kv_version {
            config.vault.kv_version = version.into();
        }
        if let Some(backend) = &self.backend {
            config.vault.backend.clone_from(backend);
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvVersionArg {
    V1,
    V2,
}

impl From<KvVersionArg> for KvVersion {
    fn from(arg: KvVersionArg) -> Self {
        match arg {
            KvVersionArg::V1 => Self::V1,
            KvVersionArg::V2 => Self::V2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fetch_with_profiles() {
        let cli = Cli::try_parse_from([
            "vault-config",
            "--json",
            "fetch",
            "--app",
            "orders",
            "-p",
            "prod,eu",
            "--profile",
            "canary",
            "--kv-version",
            "v2",
            "--fail-fast",
        ])
        .unwrap();

        assert!(cli.json);
        let Commands::Fetch(args) = cli.command else {
            panic!("Expected fetch command");
        };
        assert!(args.fail_fast);

        let mut config = Config::default();
        args.target.apply(&mut config);
        assert_eq!(config.application.name, "orders");
        assert_eq!(config.application.profiles, vec!["prod", "eu", "canary"]);
        assert_eq!(config.vault.kv_version, KvVersion::V2);
        assert_eq!(config.vault.backend, "secret");
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = Config::default();
        config.application.profiles = vec!["prod".to_string()];

        TargetArgs::default().apply(&mut config);
        assert_eq!(config.application.name, "application");
        assert_eq!(config.application.profiles, vec!["prod"]);
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["vault-config", "plan", "--config", "/etc/vault-config.yaml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/vault-config.yaml")));
        assert!(matches!(cli.command, Commands::Plan(_)));
    }
}
