//! Configuration loader with source-ordered merging.
//!
//! Resolution order (lowest to highest precedence):
//! 1. Built-in defaults
//! 2. YAML files, in the order they are listed
//! 3. Environment variables containing the configured prefix

use super::defaults::{CONFIG_FILENAME, DEFAULT_ENV_PREFIX, build_defaults};
use super::host::{Host, system_config_root};
use super::merge::merge;
use super::Config;
use crate::env::Environment;
use crate::error::ConfigError;
use heck::ToLowerCamelCase;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load a single YAML configuration file.
///
/// Merge keys (`<<: *anchor`) are expanded. An empty document is treated as
/// an empty mapping. Any other top-level value that is not a mapping is
/// rejected, as are `.inf`/`.nan` floats, which have no JSON representation.
pub fn load_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if content.trim().is_empty() {
        return Ok(Config::new());
    }

    let parse_err = |source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    };
    let mut yaml: serde_yaml::Value = serde_yaml::from_str(&content).map_err(parse_err)?;
    yaml.apply_merge().map_err(parse_err)?;

    if let Some(key) = find_non_finite(&yaml, "") {
        return Err(ConfigError::NonFiniteNumber {
            path: path.to_path_buf(),
            key,
        });
    }

    let value = serde_json::to_value(yaml).map_err(|source| ConfigError::Convert {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Config::new()),
        other => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
            found: value_kind(&other),
        }),
    }
}

/// Dotted location of the first infinite or NaN float, if any.
fn find_non_finite(value: &serde_yaml::Value, at: &str) -> Option<String> {
    let child = |segment: &str| {
        if at.is_empty() {
            segment.to_string()
        } else {
            format!("{at}.{segment}")
        }
    };
    match value {
        serde_yaml::Value::Number(n) => n
            .as_f64()
            .filter(|f| n.is_f64() && !f.is_finite())
            .map(|_| at.to_string()),
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, item)| find_non_finite(item, &child(&i.to_string()))),
        serde_yaml::Value::Mapping(map) => map.iter().find_map(|(k, v)| {
            let segment = match k {
                serde_yaml::Value::String(s) => s.clone(),
                other => serde_yaml::to_string(other)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default(),
            };
            find_non_finite(v, &child(&segment))
        }),
        serde_yaml::Value::Tagged(tagged) => find_non_finite(&tagged.value, at),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Load and merge configuration files in order.
///
/// Missing files are skipped. A file that exists but cannot be read or parsed
/// aborts the whole load.
pub fn load_files<I, P>(paths: I) -> Result<Config, ConfigError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    load_files_tracked(paths).map(|(config, _)| config)
}

/// Like [`load_files`], also returning the files that were actually merged.
fn load_files_tracked<I, P>(paths: I) -> Result<(Config, Vec<PathBuf>), ConfigError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut config = Config::new();
    let mut loaded = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, skipping");
            continue;
        }
        debug!(path = %path.display(), "loading config file");
        config = merge(config, load_file(path)?);
        loaded.push(path.to_path_buf());
    }
    Ok((config, loaded))
}

/// Collect configuration from environment variables containing `prefix`.
///
/// The first occurrence of `prefix` is removed from the name and the rest is
/// converted to lowerCamelCase (`LANDO_PROXY_DOMAIN` → `proxyDomain`). Values
/// stay raw strings.
pub fn load_envs(env: &Environment, prefix: &str) -> Config {
    env.iter()
        .filter(|(key, _)| key.contains(prefix))
        .map(|(key, value)| {
            let stripped = key.replacen(prefix, "", 1);
            (
                stripped.to_lower_camel_case(),
                Value::String(value.to_string()),
            )
        })
        .collect()
}

/// Look up a nested value by dot-separated path (`runtime.version`).
///
/// Numeric segments index into arrays. An empty path returns `None`.
pub fn lookup<'a>(config: &'a Config, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.').filter(|s| !s.is_empty());
    let mut current = config.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Result of a full resolution.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The merged configuration.
    pub config: Config,
    /// Files that existed and were merged, in order.
    pub loaded_files: Vec<PathBuf>,
}

/// Resolves the runtime configuration from defaults, files and environment.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    host: Host,
    /// Extra files merged after the default search roots.
    extra_sources: Vec<PathBuf>,
    env_prefix: String,
}

impl ConfigResolver {
    pub fn new(host: Host) -> Self {
        Self {
            host,
            extra_sources: Vec::new(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Add files merged on top of the default sources, in order.
    pub fn with_sources(mut self, sources: impl IntoIterator<Item = PathBuf>) -> Self {
        self.extra_sources.extend(sources);
        self
    }

    /// Change the environment marker.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Ordered list of candidate files, without duplicates.
    ///
    /// Defaults' `configSources` come first, then the system and user roots,
    /// then any extra sources.
    pub fn source_paths(&self, defaults: &Config, env: &Environment) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = defaults
            .get("configSources")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default();

        if let Some(root) = system_config_root(self.host.os, env) {
            paths.push(root.join(CONFIG_FILENAME));
        }
        paths.push(self.host.user_config_root().join(CONFIG_FILENAME));
        paths.extend(self.extra_sources.iter().cloned());

        let mut unique: Vec<PathBuf> = Vec::with_capacity(paths.len());
        for path in paths {
            if !unique.contains(&path) {
                unique.push(path);
            }
        }
        unique
    }

    /// Run the full resolution against `env`.
    pub fn resolve(&self, env: &Environment) -> Result<ResolvedConfig, ConfigError> {
        let defaults = build_defaults(&self.host, env);
        let paths = self.source_paths(&defaults, env);
        let (files, loaded_files) = load_files_tracked(&paths)?;
        let envs = load_envs(env, &self.env_prefix);
        debug!(
            files = loaded_files.len(),
            env_keys = envs.len(),
            prefix = %self.env_prefix,
            "resolved configuration"
        );

        let config = merge(merge(defaults, files), envs);

        Ok(ResolvedConfig {
            config,
            loaded_files,
        })
    }
}
