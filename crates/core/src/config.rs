//! Locating and reading `surfsup.toml`.
//!
//! Flags beat environment variables, which beat the file, which beats the
//! built-in defaults. Only the file lookup lives here; the merge happens in
//! the service crate.

use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use log::debug;
use serde::de::DeserializeOwned;

use crate::APP_NAME;

/// Where the settings came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// `--config` or the config env var
    Explicit(PathBuf),
    CurrentDir(PathBuf),
    /// `$XDG_CONFIG_HOME/surfs-up/`, else `~/.config/surfs-up/`
    XdgConfig(PathBuf),
    /// `/etc/surfs-up/`
    System(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::CurrentDir(p)
            | ConfigSource::XdgConfig(p)
            | ConfigSource::System(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }

    fn is_present(&self) -> bool {
        self.path().is_some_and(Path::is_file)
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(p) => write!(f, "{}", p.display()),
            None => write!(f, "(defaults)"),
        }
    }
}

/// Candidate locations for `filename`, most specific first.
pub fn search_order(explicit: Option<PathBuf>, filename: &str) -> Vec<ConfigSource> {
    let mut candidates = Vec::with_capacity(4);
    if let Some(path) = explicit {
        candidates.push(ConfigSource::Explicit(path));
    }
    candidates.push(ConfigSource::CurrentDir(PathBuf::from(filename)));
    candidates.push(ConfigSource::XdgConfig(
        config_home().join(APP_NAME).join(filename),
    ));
    candidates.push(ConfigSource::System(
        Path::new("/etc").join(APP_NAME).join(filename),
    ));
    candidates
}

/// First existing file among [`search_order`], with the explicit path taken
/// from `env_var`.
pub fn find_config_file(env_var: &str, filename: &str) -> ConfigSource {
    let explicit = env::var_os(env_var).map(PathBuf::from);
    let source = search_order(explicit, filename)
        .into_iter()
        .find(ConfigSource::is_present)
        .unwrap_or(ConfigSource::Defaults);
    debug!("config source: {}", source);
    source
}

fn config_home() -> PathBuf {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"))
}

/// Parses the TOML file behind `source`, or `T::default()` for
/// [`ConfigSource::Defaults`].
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> anyhow::Result<T> {
    let Some(path) = source.path() else {
        return Ok(T::default());
    };
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
