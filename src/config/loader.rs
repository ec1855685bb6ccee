// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::model::RawConfigFile;
use crate::config::settings::Config;
use crate::errors::Result;

static ENV_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("env reference regex is valid")
});

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// Environment references (`$VAR`, `${VAR}`) are expanded before parsing.
/// This does **not** perform semantic validation; use
/// [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    parse_str(&contents)
}

/// Parse config text (after env expansion) into the raw model.
pub fn parse_str(contents: &str) -> Result<RawConfigFile> {
    let expanded = expand_env(contents);
    let config: RawConfigFile = toml::from_str(&expanded)?;
    Ok(config)
}

/// Load a configuration file from path, validate it and resolve it.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML (with env expansion).
/// - Checks watch paths, action names and per-type required fields.
/// - Applies defaults (intervals, debounce, timeouts, overwrite).
/// - Compiles include/exclude globs.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Config> {
    let raw_config = load_from_path(&path)?;
    let config = Config::try_from(raw_config)?;
    Ok(config)
}

/// Default config location: `pollwatch.toml` in the current directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("pollwatch.toml")
}

/// Expand `$VAR` / `${VAR}` from the process environment.
///
/// Unset variables expand to the empty string.
pub fn expand_env(input: &str) -> String {
    expand_env_with(input, |name| std::env::var(name).ok())
}

/// Like [`expand_env`], with a custom variable lookup.
pub fn expand_env_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_REF
        .replace_all(input, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            lookup(name).unwrap_or_default()
        })
        .into_owned()
}
