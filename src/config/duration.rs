// src/config/duration.rs

//! Millisecond durations as written in the config file.

use std::time::Duration;

use serde::Deserialize;

/// A duration given either as an integer number of milliseconds
/// (`debounce_ms = 200`) or as a string with a unit suffix
/// (`max_age_ms = "2h"`).
///
/// Zero means "unset" for fields that inherit a default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawDuration")]
pub struct MillisDuration(pub u64);

impl MillisDuration {
    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Millis(u64),
    Text(String),
}

impl TryFrom<RawDuration> for MillisDuration {
    type Error = String;

    fn try_from(raw: RawDuration) -> Result<Self, Self::Error> {
        match raw {
            RawDuration::Millis(ms) => Ok(MillisDuration(ms)),
            RawDuration::Text(s) => {
                let d = parse_duration(&s)?;
                let ms = u64::try_from(d.as_millis())
                    .map_err(|_| format!("duration '{s}' is too large"))?;
                Ok(MillisDuration(ms))
            }
        }
    }
}

/// Parse strings like `"250ms"`, `"3s"`, `"5m"`, `"2h"` or a bare number of
/// milliseconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = match s.chars().position(|c| !c.is_ascii_digit()) {
        Some(idx) => idx,
        None => {
            let ms: u64 = s
                .parse()
                .map_err(|e| format!("invalid duration number '{}': {}", s, e))?;
            return Ok(Duration::from_millis(ms));
        }
    };

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit: u64 = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 60 * 60 * 24,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, h or d",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{s}' is too large"))
}
