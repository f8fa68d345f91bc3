//! Lando bootstrap CLI
//!
//! Resolves the runtime configuration at startup and runs the cached
//! self-update check.

use anyhow::{Context, Result};
use clap::Parser;
use lando_bootstrap::cli::{Cli, Command, ConfigArgs, ConfigFormat, EnvArgs, UpdateArgs};
use lando_bootstrap::config::{Config, ConfigResolver, Host, ResolvedConfig, VERSION, lookup};
use lando_bootstrap::env::Environment;
use lando_bootstrap::logging::{LogTarget, console_level};
use lando_bootstrap::update::{GithubReleaseFeed, UpdateCache, UpdateChecker, update_available};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut env = Environment::from_process();
    let host = Host::detect();
    let resolver = ConfigResolver::new(host)
        .with_sources(cli.config.iter().cloned())
        .with_env_prefix(cli.env_prefix.clone());

    // With --verbose the level is known before any config is read, so install
    // early and keep file discovery logs. Otherwise the level comes from the
    // resolved config and the subscriber can only be installed afterwards;
    // the loaded files are re-logged below since their debug events are lost.
    let target = LogTarget::parse(&cli.log);
    if cli.verbose {
        target.install(console_level(true, None))?;
    }

    // Configuration is a prerequisite for everything else, including the log level.
    let resolved = resolver
        .resolve(&env)
        .context("failed to resolve configuration")?;

    if !cli.verbose {
        let configured = resolved.config.get("logLevelConsole").and_then(Value::as_str);
        target.install(console_level(false, configured))?;
        for path in &resolved.loaded_files {
            debug!(path = %path.display(), "merged config file");
        }
    }

    match cli.command {
        Some(Command::Config(args)) => run_config(&resolved, &args)?,
        None => run_config(&resolved, &ConfigArgs::default())?,
        Some(Command::Update(args)) => run_update(&resolved.config, &args).await?,
        Some(Command::Env(args)) => run_env(&resolver, &resolved.config, &mut env, &args),
    }

    Ok(())
}

fn run_config(resolved: &ResolvedConfig, args: &ConfigArgs) -> Result<()> {
    let value = match &args.path {
        Some(path) => lookup(&resolved.config, path)
            .cloned()
            .with_context(|| format!("no configuration value at '{path}'"))?,
        None => Value::Object(resolved.config.clone()),
    };

    let rendered = match args.format {
        ConfigFormat::Json => serde_json::to_string_pretty(&value)?,
        ConfigFormat::Yaml => serde_yaml::to_string(&value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn user_config_root(config: &Config) -> Option<PathBuf> {
    config
        .get("userConfRoot")
        .and_then(Value::as_str)
        .map(PathBuf::from)
}

async fn run_update(config: &Config, args: &UpdateArgs) -> Result<()> {
    let cache = user_config_root(config).map(|root| UpdateCache::in_user_root(&root));
    let cached = if args.force {
        None
    } else {
        cache.as_ref().and_then(UpdateCache::load)
    };

    let mut feed = GithubReleaseFeed::new()?;
    if let Some(api_base) = &args.api_base {
        feed = feed.with_api_base(api_base.clone());
    }
    let outcome = UpdateChecker::new(feed).check(cached, VERSION).await;
    let record = outcome.record;

    if !outcome.refreshed {
        info!(expires = record.expires, "using cached update record");
    } else if let Some(cache) = &cache
        && let Err(err) = cache.save(&record)
    {
        warn!(path = %cache.path().display(), error = %err, "failed to cache update record");
    }

    if update_available(VERSION, &record.version) {
        println!("Update available: {VERSION} -> {}", record.version);
        if !record.url.is_empty() {
            println!("{}", record.url);
        }
    } else {
        println!("lando-bootstrap {VERSION} is up to date");
    }
    Ok(())
}

fn run_env(resolver: &ConfigResolver, config: &Config, env: &mut Environment, args: &EnvArgs) {
    let bin_dir = args.bin_dir.clone().unwrap_or_else(|| {
        config
            .get("srcRoot")
            .and_then(Value::as_str)
            .map(PathBuf::from)
            .unwrap_or_else(|| resolver.host().install_root.clone())
    });

    env.update_path(resolver.host().os, &bin_dir.to_string_lossy());
    env.strip_env(resolver.env_prefix());

    for (key, value) in env.iter() {
        println!("{key}={value}");
    }
}
