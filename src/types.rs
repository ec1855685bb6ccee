// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Kind of change detected between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Create,
    Modify,
    Delete,
    Move,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Create => "create",
            EventKind::Modify => "modify",
            EventKind::Delete => "delete",
            EventKind::Move => "move",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" => Ok(EventKind::Create),
            "modify" => Ok(EventKind::Modify),
            "delete" => Ok(EventKind::Delete),
            "move" => Ok(EventKind::Move),
            other => Err(format!(
                "invalid event kind: {other} (expected create, modify, delete or move)"
            )),
        }
    }
}

/// Tag for the action kinds a watch can dispatch.
///
/// The configuration file names these in `type = "..."`; the executor uses
/// them as keys into its runner registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Exec,
    Copy,
    Move,
    Rename,
    Webhook,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Exec => "exec",
            ActionType::Copy => "copy",
            ActionType::Move => "move",
            ActionType::Rename => "rename",
            ActionType::Webhook => "webhook",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
