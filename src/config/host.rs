//! Host platform facts used to compute default roots.

use crate::env::Environment;
use std::path::PathBuf;

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    MacOs,
    Linux,
    /// Anything else; has no conventional system configuration root.
    Other,
}

impl OsFamily {
    /// Family of the OS this binary was built for.
    pub fn current() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` style name to a family.
    pub fn from_os_name(name: &str) -> Self {
        match name {
            "windows" => OsFamily::Windows,
            "macos" => OsFamily::MacOs,
            "linux" => OsFamily::Linux,
            _ => OsFamily::Other,
        }
    }

    /// Name of the executable search-path variable.
    pub fn path_var(self) -> &'static str {
        match self {
            OsFamily::Windows => "Path",
            _ => "PATH",
        }
    }

    /// Separator between search-path entries.
    pub fn path_delimiter(self) -> char {
        match self {
            OsFamily::Windows => ';',
            _ => ':',
        }
    }

    /// Platform label reported in the defaults.
    pub fn as_str(self) -> &'static str {
        match self {
            OsFamily::Windows => "win32",
            OsFamily::MacOs => "darwin",
            OsFamily::Linux => "linux",
            OsFamily::Other => "other",
        }
    }
}

impl std::fmt::Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facts about the machine the tool is running on.
#[derive(Debug, Clone)]
pub struct Host {
    pub os: OsFamily,
    pub arch: String,
    pub home: PathBuf,
    /// Directory the tool is installed in.
    pub install_root: PathBuf,
}

impl Host {
    /// Detect host facts from the running process.
    pub fn detect() -> Self {
        let install_root = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            os: OsFamily::current(),
            arch: std::env::consts::ARCH.to_string(),
            home: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
            install_root,
        }
    }

    /// Per-user configuration root (`~/.lando`).
    pub fn user_config_root(&self) -> PathBuf {
        self.home.join(".lando")
    }
}

/// OS-conventional system configuration root.
///
/// Returns `None` on Windows when `ProgramW6432` is unset, and on any
/// unsupported family.
pub fn system_config_root(os: OsFamily, env: &Environment) -> Option<PathBuf> {
    match os {
        OsFamily::Windows => env
            .get("ProgramW6432")
            .map(|program_files| PathBuf::from(program_files).join("Lando")),
        OsFamily::MacOs => Some(PathBuf::from("/Library/Application Support/Lando")),
        OsFamily::Linux => Some(PathBuf::from("/usr/share/lando")),
        OsFamily::Other => None,
    }
}
