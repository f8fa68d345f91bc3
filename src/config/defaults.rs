//! Built-in default configuration.

use super::Config;
use super::host::{Host, system_config_root};
use crate::env::Environment;
use serde_json::{Value, json};
use std::path::Path;

/// Name of the configuration file looked up in each root.
pub const CONFIG_FILENAME: &str = "config.yml";

/// Marker that selects environment variables folded into configuration.
pub const DEFAULT_ENV_PREFIX: &str = "LANDO_";

/// Log level for file output.
pub const DEFAULT_LOG_LEVEL: &str = "debug";

/// Log level for console output.
pub const DEFAULT_LOG_LEVEL_CONSOLE: &str = "warn";

/// Version of the running tool.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn path_value(path: &Path) -> Value {
    Value::String(path.to_string_lossy().into_owned())
}

/// Build the default configuration for `host`.
///
/// Reads nothing beyond the supplied host facts and environment snapshot.
/// `sysConfRoot` is left out entirely when the platform has none.
pub fn build_defaults(host: &Host, env: &Environment) -> Config {
    let sys_conf_root = system_config_root(host.os, env);
    let user_conf_root = host.user_config_root();

    let mut plugin_dirs = vec![path_value(&host.install_root)];
    if let Some(ref root) = sys_conf_root {
        plugin_dirs.push(path_value(root));
    }
    plugin_dirs.push(path_value(&user_conf_root.join("plugins")));

    let env_snapshot: serde_json::Map<String, Value> = env
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect();

    let mut config = match json!({
        "configFilename": CONFIG_FILENAME,
        "configSources": [path_value(&host.install_root.join(CONFIG_FILENAME))],
        "env": env_snapshot,
        "envPrefix": DEFAULT_ENV_PREFIX,
        "home": path_value(&host.home),
        "logLevel": DEFAULT_LOG_LEVEL,
        "logLevelConsole": DEFAULT_LOG_LEVEL_CONSOLE,
        "runtime": {
            "version": VERSION,
            "platform": host.os.as_str(),
            "arch": host.arch,
        },
        "version": VERSION,
        "pluginDirs": plugin_dirs,
        "srcRoot": path_value(&host.install_root),
        "userConfRoot": path_value(&user_conf_root),
    }) {
        Value::Object(map) => map,
        _ => Config::new(),
    };

    if let Some(root) = sys_conf_root {
        config.insert("sysConfRoot".to_string(), path_value(&root));
    }

    config
}
