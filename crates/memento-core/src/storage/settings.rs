//! TOML-based user settings.
//!
//! Stores the temporal anchors the countdown runs on:
//! - Birthday and life expectancy (life scope)
//! - Optional goal date and name (goal scope)
//! - Bedtime (day scope)
//! - Workday composition hours (disposable-time filter)
//! - Theme name (drivers only)
//!
//! Settings are stored at `~/.config/memento/settings.toml`. Every field is
//! defaulted, so a partial file merges over defaults and a file that fails
//! to parse falls back entirely to defaults. Loading never fails.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// User settings.
///
/// Serialized to/from TOML at `~/.config/memento/settings.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_birthday")]
    pub birthday: NaiveDate,
    #[serde(default = "default_life_expectancy")]
    pub life_expectancy: u32,
    #[serde(default, with = "opt_date")]
    pub goal_date: Option<NaiveDate>,
    #[serde(default)]
    pub goal_name: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// End of the subjective day; `None` means the day runs to 23:59:59.999.
    #[serde(default = "default_bedtime", with = "opt_time")]
    pub bedtime: Option<NaiveTime>,
    #[serde(default = "default_sleep_hours")]
    pub sleep_hours: f64,
    #[serde(default = "default_work_hours")]
    pub work_hours: f64,
    #[serde(default = "default_chore_hours")]
    pub chore_hours: f64,
    #[serde(default = "default_commute_hours")]
    pub commute_hours: f64,
}

/// Optional dates as plain strings, with "" standing in for unset so the
/// TOML file round-trips a cleared field instead of omitting the key.
mod opt_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => s.serialize_str(&date.to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}

/// Optional times as "HH:MM:SS" strings; also accepts the compact "HH:MM"
/// form used by drivers, and "" for unset.
mod opt_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => s.serialize_str(&time.format("%H:%M:%S").to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveTime::parse_from_str(&raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

// Default functions
fn default_birthday() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default()
}
fn default_life_expectancy() -> u32 {
    80
}
fn default_theme() -> String {
    "precision".into()
}
fn default_bedtime() -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(23, 0, 0)
}
fn default_sleep_hours() -> f64 {
    7.0
}
fn default_work_hours() -> f64 {
    8.0
}
fn default_chore_hours() -> f64 {
    2.0
}
fn default_commute_hours() -> f64 {
    1.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            birthday: default_birthday(),
            life_expectancy: default_life_expectancy(),
            goal_date: None,
            goal_name: String::new(),
            theme: default_theme(),
            bedtime: default_bedtime(),
            sleep_hours: default_sleep_hours(),
            work_hours: default_work_hours(),
            chore_hours: default_chore_hours(),
            commute_hours: default_commute_hours(),
        }
    }
}

impl Settings {
    fn path() -> Result<PathBuf, std::io::Error> {
        Ok(data_dir()?.join("settings.toml"))
    }

    /// Load from disk. Any failure (missing file, unreadable, malformed)
    /// degrades to defaults; a malformed file is reported on stderr.
    pub fn load() -> Self {
        let Ok(path) = Self::path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                eprintln!("Warning: {e}; using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path().map_err(|e| ConfigError::SaveFailed {
            path: PathBuf::from("~/.config/memento/settings.toml"),
            message: e.to_string(),
        })?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Hours per day committed to sleep, work, chores, and commute.
    pub fn fixed_hours(&self) -> f64 {
        self.sleep_hours + self.work_hours + self.chore_hours + self.commute_hours
    }

    /// Hours per day left after fixed commitments, clamped at zero.
    pub fn disposable_hours(&self) -> f64 {
        (24.0 - self.fixed_hours()).max(0.0)
    }

    /// Get a settings value as string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let value = Self::get_json_value_by_path(&json, key)?;
        match value {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a settings value by key and persist.
    ///
    /// Validation problems (unknown key, unparsable value) are errors;
    /// a storage failure is reported on stderr and swallowed, leaving the
    /// process in non-persistent mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        if let Err(e) = self.save() {
            eprintln!("Warning: {e}");
        }
        Ok(())
    }

    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let obj = root
            .as_object_mut()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        // An empty string clears optional fields (goal_date, bedtime).
        let new_value = if value.is_empty() {
            serde_json::Value::String(String::new())
        } else {
            match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: e.to_string(),
                    })?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| ConfigError::InvalidValue {
                                key: key.to_string(),
                                message: format!("cannot parse '{value}' as number"),
                            })?
                    } else {
                        return Err(ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: format!("cannot parse '{value}' as number"),
                        });
                    }
                }
                _ => serde_json::Value::String(value.to_string()),
            }
        };

        obj.insert(key.to_string(), new_value);
        Ok(())
    }
}
