//! Runtime configuration resolution.
//!
//! Builds one merged configuration from three sources, later sources winning:
//! 1. **Defaults** - computed from the host (roots, versions, log levels)
//! 2. **Files** - `config.yml` in the install root, system root and `~/.lando`,
//!    then any files passed on the command line
//! 3. **Environment** - variables containing the prefix marker (default `LANDO_`)
//!
//! ## Merge Strategy
//! - Objects: deep merge key by key
//! - Arrays: order-preserving union of both sides
//! - Everything else: the later source replaces the earlier one

mod defaults;
mod host;
mod loader;
mod merge;

use serde_json::{Map, Value};

/// A resolved configuration object.
pub type Config = Map<String, Value>;

pub use defaults::{
    CONFIG_FILENAME, DEFAULT_ENV_PREFIX, DEFAULT_LOG_LEVEL, DEFAULT_LOG_LEVEL_CONSOLE, VERSION,
    build_defaults,
};
pub use host::{Host, OsFamily, system_config_root};
pub use loader::{ConfigResolver, ResolvedConfig, load_envs, load_file, load_files, lookup};
pub use merge::{deep_merge, merge};
