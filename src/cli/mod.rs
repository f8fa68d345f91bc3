//! CLI command definitions for lando-bootstrap
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use crate::config::DEFAULT_ENV_PREFIX;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for the `config` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ConfigFormat {
    #[default]
    Yaml,
    Json,
}

/// Resolve Lando runtime configuration and check for updates
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Extra configuration file, merged after the default sources (repeatable)
    #[arg(short, long = "config", global = true)]
    pub config: Vec<PathBuf>,

    /// Marker selecting environment variables that override configuration
    #[arg(long, default_value = DEFAULT_ENV_PREFIX, global = true)]
    pub env_prefix: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved configuration (default if no subcommand given)
    Config(ConfigArgs),

    /// Check whether a newer release is available
    Update(UpdateArgs),

    /// Print the environment handed to child processes
    Env(EnvArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct ConfigArgs {
    /// Only print the value at this dot-separated path (e.g. runtime.version)
    #[arg(short, long)]
    pub path: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: ConfigFormat,
}

#[derive(clap::Args, Debug, Default)]
pub struct UpdateArgs {
    /// Ignore the cached record and query the release feed
    #[arg(long)]
    pub force: bool,

    /// Release API root (defaults to api.github.com)
    #[arg(long)]
    pub api_base: Option<String>,
}

#[derive(clap::Args, Debug, Default)]
pub struct EnvArgs {
    /// Directory to prepend to the search path (defaults to the install root)
    #[arg(long)]
    pub bin_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["lando-bootstrap"]).unwrap();
        assert!(cli.config.is_empty());
        assert_eq!(cli.env_prefix, "LANDO_");
        assert_eq!(cli.log, "2");
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_repeated_config_and_subcommand() {
        let cli = Cli::try_parse_from([
            "lando-bootstrap",
            "-c",
            "a.yml",
            "--config",
            "b.yml",
            "config",
            "--path",
            "runtime.version",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.config, vec![PathBuf::from("a.yml"), PathBuf::from("b.yml")]);
        match cli.command {
            Some(Command::Config(args)) => {
                assert_eq!(args.path.as_deref(), Some("runtime.version"));
                assert_eq!(args.format, ConfigFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_update_force() {
        let cli = Cli::try_parse_from(["lando-bootstrap", "update", "--force"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Update(UpdateArgs { force: true, .. }))));
    }
}
