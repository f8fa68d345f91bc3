//! Tracing subscriber setup.
//!
//! Output goes to stdout, stderr, an append-mode file, or nowhere, selected by
//! the `--log` option. The level comes from `--verbose` or from the resolved
//! `logLevelConsole` setting.

use crate::config::DEFAULT_LOG_LEVEL_CONSOLE;
use anyhow::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Where log output is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stdout,
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// Parse `0`/`off`, `1`/`stdout`, `2`/`stderr`, or a file name.
    pub fn parse(value: &str) -> Self {
        match value {
            "0" | "off" => LogTarget::Off,
            "1" | "stdout" => LogTarget::Stdout,
            "2" | "stderr" => LogTarget::Stderr,
            filename => LogTarget::File(PathBuf::from(filename)),
        }
    }

    /// Install the global subscriber for this target.
    pub fn install(&self, level: Level) -> Result<()> {
        match self {
            LogTarget::Off => {}
            LogTarget::Stdout => {
                let subscriber = FmtSubscriber::builder()
                    .with_max_level(level)
                    .with_writer(std::io::stdout)
                    .finish();
                tracing::subscriber::set_global_default(subscriber)?;
            }
            LogTarget::Stderr => {
                let subscriber = FmtSubscriber::builder()
                    .with_max_level(level)
                    .with_writer(std::io::stderr)
                    .finish();
                tracing::subscriber::set_global_default(subscriber)?;
            }
            LogTarget::File(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                let subscriber = FmtSubscriber::builder()
                    .with_max_level(level)
                    .with_writer(file)
                    .with_ansi(false)
                    .finish();
                tracing::subscriber::set_global_default(subscriber)?;
            }
        }
        Ok(())
    }
}

/// Map a configured level name to a tracing level.
///
/// Accepts `error`, `warn`/`warning`, `info`, `verbose`, `debug`, `silly`/`trace`.
/// Unknown names map to `WARN`.
pub fn level_from_name(name: &str) -> Level {
    match name.trim().to_ascii_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" | "warning" => Level::WARN,
        "info" => Level::INFO,
        "verbose" | "debug" => Level::DEBUG,
        "silly" | "trace" => Level::TRACE,
        _ => Level::WARN,
    }
}

/// Console level for a run: `DEBUG` when verbose, else the configured name
/// (falling back to the built-in console default).
pub fn console_level(verbose: bool, configured: Option<&str>) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        level_from_name(configured.unwrap_or(DEFAULT_LOG_LEVEL_CONSOLE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_targets() {
        assert_eq!(LogTarget::parse("0"), LogTarget::Off);
        assert_eq!(LogTarget::parse("off"), LogTarget::Off);
        assert_eq!(LogTarget::parse("1"), LogTarget::Stdout);
        assert_eq!(LogTarget::parse("stderr"), LogTarget::Stderr);
        assert_eq!(
            LogTarget::parse("lando.log"),
            LogTarget::File(PathBuf::from("lando.log"))
        );
    }

    #[test]
    fn test_level_from_name() {
        assert_eq!(level_from_name("warn"), Level::WARN);
        assert_eq!(level_from_name("DEBUG"), Level::DEBUG);
        assert_eq!(level_from_name("verbose"), Level::DEBUG);
        assert_eq!(level_from_name("silly"), Level::TRACE);
        assert_eq!(level_from_name("bogus"), Level::WARN);
    }

    #[test]
    fn test_console_level() {
        assert_eq!(console_level(true, None), Level::DEBUG);
        assert_eq!(console_level(true, Some("error")), Level::DEBUG);
        assert_eq!(console_level(false, Some("info")), Level::INFO);
        assert_eq!(console_level(false, None), Level::WARN);
    }
}
