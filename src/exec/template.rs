// src/exec/template.rs

//! `{token}` substitution for commands, destinations, URLs and env values.
//!
//! Recognised tokens:
//!
//! | token        | value                                   |
//! |--------------|-----------------------------------------|
//! | `{path}`     | absolute path                           |
//! | `{relpath}`  | path relative to the watch root         |
//! | `{dir}`      | parent directory of `{path}`            |
//! | `{name}`     | file name                               |
//! | `{stem}`     | file name without extension             |
//! | `{ext}`      | extension including the dot, or empty   |
//! | `{event}`    | create / modify / delete / move         |
//! | `{size}`     | size in bytes                           |
//! | `{mtime}`    | modification time, RFC 3339 (UTC)       |
//! | `{age_ms}`   | age in milliseconds                     |
//! | `{age_days}` | age in whole days                       |
//!
//! Anything else in braces is left untouched.

use std::sync::LazyLock;
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::{Captures, Regex};

use crate::watch::ChangeEvent;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("token regex is valid"));

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Expand every recognised token in `template` using `event`.
pub fn expand(template: &str, event: &ChangeEvent) -> String {
    if !template.contains('{') {
        return template.to_string();
    }
    let vars = TemplateVars::from_event(event);
    TOKEN
        .replace_all(template, |caps: &Captures<'_>| {
            vars.lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Format a timestamp the way `{mtime}` and webhook payloads show it.
pub fn format_mtime(t: SystemTime) -> String {
    DateTime::<Utc>::from(t).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Values available to a template, precomputed from one event.
#[derive(Debug, Clone)]
pub struct TemplateVars {
    path: String,
    relpath: String,
    dir: String,
    name: String,
    stem: String,
    ext: String,
    event: &'static str,
    size: u64,
    mtime: String,
    age_ms: u128,
    age_days: u64,
}

impl TemplateVars {
    pub fn from_event(event: &ChangeEvent) -> Self {
        let name = event
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (stem, ext) = split_name(&name);

        Self {
            path: event.path.to_string_lossy().into_owned(),
            relpath: event.rel_path.clone(),
            dir: event
                .path
                .parent()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
            stem: stem.to_string(),
            ext: ext.to_string(),
            name,
            event: event.kind.as_str(),
            size: event.record.size,
            mtime: format_mtime(event.record.modified),
            age_ms: event.age.as_millis(),
            age_days: event.age.as_secs() / SECS_PER_DAY,
        }
    }

    pub fn lookup(&self, token: &str) -> Option<String> {
        let value = match token {
            "path" => self.path.clone(),
            "relpath" => self.relpath.clone(),
            "dir" => self.dir.clone(),
            "name" => self.name.clone(),
            "stem" => self.stem.clone(),
            "ext" => self.ext.clone(),
            "event" => self.event.to_string(),
            "size" => self.size.to_string(),
            "mtime" => self.mtime.clone(),
            "age_ms" => self.age_ms.to_string(),
            "age_days" => self.age_days.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

/// Split at the last dot, unless the dot is the first character
/// (`.bashrc` has no extension).
fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    }
}
