//! TOML-based display configuration.
//!
//! Stores user preferences for the front end:
//! - Countdown tick and full-refresh cadence
//! - Date format and default output mode
//! - Optional seed for the advisory message pick
//!
//! The treatment schedule is not configurable; it is
//! [`Schedule::treatment_plan`](crate::Schedule::treatment_plan).
//!
//! Configuration is stored at `~/.config/aligner-tracker/config.toml`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result};

/// Front-end rendering preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Seconds between countdown repaints in `watch`.
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
    /// Seconds between full state refreshes in `watch`.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    /// `chrono` strftime pattern for dates.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Print JSON instead of text by default.
    #[serde(default)]
    pub json: bool,
}

/// Advisory message configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// Fixed seed for early-band message picks. Unset = fresh entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/aligner-tracker/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub advisory: AdvisoryConfig,
}

fn default_tick_secs() -> u64 {
    1
}
fn default_refresh_secs() -> u64 {
    60
}
fn default_date_format() -> String {
    "%-d %B %Y".into()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tick_secs: default_tick_secs(),
            refresh_secs: default_refresh_secs(),
            date_format: default_date_format(),
            json: false,
        }
    }
}

/// Render `at` with a strftime `pattern`, `None` if chrono cannot.
///
/// Patterns that need an offset (`%z`, `%Z`) fail on naive dates.
fn render_date(pattern: &str, at: NaiveDateTime) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", at.format(pattern)).ok()?;
    Some(out)
}

impl DisplayConfig {
    /// Format `at` with `date_format`, falling back to the default pattern.
    pub fn format_date(&self, at: NaiveDateTime) -> String {
        render_date(&self.date_format, at)
            .or_else(|| render_date(&default_date_format(), at))
            .unwrap_or_else(|| at.to_string())
    }
}

impl Config {
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
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                ),
                // "none" writes null; deserialization only accepts that for
                // optional fields.
                serde_json::Value::Number(_) | serde_json::Value::Null => {
                    if value.eq_ignore_ascii_case("none") {
                        serde_json::Value::Null
                    } else {
                        serde_json::Value::Number(
                            value
                                .parse::<u64>()
                                .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                                .into(),
                        )
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("cannot set a whole section".into()));
                }
                serde_json::Value::String(_) => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined or created.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or is
    /// invalid, or if the defaults cannot be written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Load from the default location, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Reject values the front end cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for zero cadences or a date
    /// format chrono cannot render.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sample = NaiveDate::from_ymd_opt(2026, 1, 20)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        if render_date(&self.display.date_format, sample).is_none() {
            return Err(ConfigError::InvalidValue {
                key: "display.date_format".into(),
                message: format!("'{}' is not a valid strftime pattern", self.display.date_format),
            });
        }
        if self.display.tick_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "display.tick_secs".into(),
                message: "must be greater than zero".into(),
            });
        }
        if self.display.refresh_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "display.refresh_secs".into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some("none".into()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}
