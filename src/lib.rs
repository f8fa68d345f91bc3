//! Lando bootstrap library
//!
//! Startup configuration resolution (defaults, YAML files, environment) and
//! cached self-update checks against a remote release feed.

pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod update;
