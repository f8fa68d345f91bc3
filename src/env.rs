//! Explicit process-environment map.
//!
//! The startup sequence snapshots the real environment once and passes this
//! map around by reference. Path updates and prefix stripping mutate the map,
//! never the live process environment, so callers decide when (and whether)
//! the result is handed to a child process.

use crate::config::OsFamily;
use std::collections::BTreeMap;

/// Mutable snapshot of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Prepend `dir` to the executable search path.
    ///
    /// Does nothing if the path variable already starts with `dir`, so repeated
    /// calls do not stack duplicate entries. Returns the resulting value.
    pub fn update_path(&mut self, os: OsFamily, dir: &str) -> String {
        let key = os.path_var();
        let current = self.get(key).unwrap_or_default();

        if current.starts_with(dir) {
            return current.to_string();
        }

        let updated = if current.is_empty() {
            dir.to_string()
        } else {
            format!("{dir}{}{current}", os.path_delimiter())
        };
        tracing::debug!(var = key, dir, "prepended directory to search path");
        self.set(key, updated.clone());
        updated
    }

    /// Remove every variable whose name contains `prefix` anywhere.
    ///
    /// Matching is substring containment, not a true prefix match.
    pub fn strip_env(&mut self, prefix: &str) -> &Self {
        let before = self.vars.len();
        self.vars.retain(|key, _| !key.contains(prefix));
        tracing::debug!(prefix, removed = before - self.vars.len(), "stripped environment");
        self
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_path_prepends_once() {
        let mut env = Environment::from_iter([("PATH", "/usr/bin:/bin")]);

        let first = env.update_path(OsFamily::Linux, "/x/bin");
        let second = env.update_path(OsFamily::Linux, "/x/bin");

        assert_eq!(first, "/x/bin:/usr/bin:/bin");
        assert_eq!(second, first);
        assert_eq!(env.get("PATH"), Some("/x/bin:/usr/bin:/bin"));
        assert_eq!(env.get("PATH").unwrap().matches("/x/bin").count(), 1);
    }

    #[test]
    fn test_update_path_windows_uses_path_and_semicolon() {
        let mut env = Environment::from_iter([("Path", r"C:\Windows")]);
        let updated = env.update_path(OsFamily::Windows, r"C:\Lando\bin");
        assert_eq!(updated, r"C:\Lando\bin;C:\Windows");
        assert_eq!(env.get("PATH"), None);
    }

    #[test]
    fn test_update_path_when_unset() {
        let mut env = Environment::new();
        assert_eq!(env.update_path(OsFamily::MacOs, "/x/bin"), "/x/bin");
        assert_eq!(env.get("PATH"), Some("/x/bin"));
    }

    #[test]
    fn test_strip_env_removes_substring_matches() {
        let mut env = Environment::from_iter([
            ("LANDO_APP", "one"),
            ("MY_LANDO_THING", "two"),
            ("HOME", "/home/me"),
            ("LANDO", "bare"),
        ]);

        env.strip_env("LANDO_");

        assert_eq!(env.get("LANDO_APP"), None);
        assert_eq!(env.get("MY_LANDO_THING"), None);
        assert_eq!(env.get("HOME"), Some("/home/me"));
        assert_eq!(env.get("LANDO"), Some("bare"));
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_strip_env_without_matches_is_noop() {
        let mut env = Environment::from_iter([("HOME", "/home/me")]);
        let before = env.clone();
        env.strip_env("LANDO_");
        assert_eq!(env, before);
    }
}
