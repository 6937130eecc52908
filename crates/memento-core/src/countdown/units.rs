//! Duration formatting and decomposition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Display unit for the main countdown number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Years,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl Unit {
    pub const ALL: [Unit; 5] = [
        Unit::Years,
        Unit::Days,
        Unit::Hours,
        Unit::Minutes,
        Unit::Seconds,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Unit::Years => "years",
            Unit::Days => "days",
            Unit::Hours => "hours",
            Unit::Minutes => "minutes",
            Unit::Seconds => "seconds",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Unit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "years" => Ok(Unit::Years),
            "days" => Ok(Unit::Days),
            "hours" => Ok(Unit::Hours),
            "minutes" => Ok(Unit::Minutes),
            "seconds" => Ok(Unit::Seconds),
            other => Err(ConfigError::InvalidValue {
                key: "unit".into(),
                message: format!("expected years|days|hours|minutes|seconds, got '{other}'"),
            }),
        }
    }
}

/// Format a duration in the given unit with the fixed display precision:
/// years 6 decimals, days/hours 4, minutes 2, seconds as a grouped integer.
/// Non-positive input renders as "0".
pub fn convert_to_unit(ms: f64, unit: Unit) -> String {
    if ms <= 0.0 {
        return "0".to_string();
    }

    let seconds = ms / 1000.0;
    let minutes = seconds / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;
    let years = days / 365.25;

    match unit {
        Unit::Years => format!("{years:.6}"),
        Unit::Days => format!("{days:.4}"),
        Unit::Hours => format!("{hours:.4}"),
        Unit::Minutes => format!("{minutes:.2}"),
        Unit::Seconds => group_thousands(seconds.floor() as i64),
    }
}

/// Integer breakdown of a duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Breakdown {
    pub fn total_seconds(&self) -> u64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }
}

/// Decompose a duration into whole days/hours/minutes/seconds.
/// All zero for non-positive input.
pub fn decompose(ms: f64) -> Breakdown {
    if ms <= 0.0 {
        return Breakdown::default();
    }

    let total = (ms / 1000.0).floor() as u64;
    Breakdown {
        days: total / 86_400,
        hours: total % 86_400 / 3_600,
        minutes: total % 3_600 / 60,
        seconds: total % 60,
    }
}

/// Format an integer with comma grouping, e.g. 1234567 -> "1,234,567".
pub fn group_thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
