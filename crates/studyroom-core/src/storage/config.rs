//! TOML-based application configuration.
//!
//! Stores planning preferences:
//! - The daily window free time is looked for in
//! - Daily study targets per priority label
//! - Grid resolution and class colors
//!
//! Configuration is stored at `~/.config/studyroom/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::grid::{GridBuilder, DEFAULT_PALETTE, DEFAULT_SLOT_MINUTES};
use crate::scheduler::{DurationTable, SchedulerConfig, WeeklyAllocator};
use crate::timeline::{DayWindow, FreeIntervalDeriver, TimeOfDay};

/// Daily window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_start")]
    pub start: String,
    #[serde(default = "default_window_end")]
    pub end: String,
    /// Free intervals shorter than this are ignored (0 keeps all)
    #[serde(default)]
    pub min_free_minutes: u32,
}

/// Study target configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetsConfig {
    #[serde(flatten)]
    pub hours: DurationTable,
    /// Daily study cap in minutes (0 = no cap)
    #[serde(default)]
    pub max_daily_minutes: u32,
}

/// Grid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/studyroom/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub targets: TargetsConfig,
    #[serde(default)]
    pub grid: GridConfig,
}

// Default functions
fn default_window_start() -> String {
    "09:00".into()
}
fn default_window_end() -> String {
    "21:00".into()
}
fn default_slot_minutes() -> u32 {
    DEFAULT_SLOT_MINUTES
}
fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start: default_window_start(),
            end: default_window_end(),
            min_free_minutes: 0,
        }
    }
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            hours: DurationTable::default(),
            max_daily_minutes: 0,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            slot_minutes: default_slot_minutes(),
            palette: default_palette(),
        }
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
    ) -> std::result::Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(invalid("config key is empty".into()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| invalid("unknown config key".into()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| invalid("unknown config key".into()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| invalid("unknown config key".into()))?;
        }

        Err(invalid("unknown config key".into()))
    }

    /// Default config file location.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default, writing the default out on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content).map_err(ConfigError::from)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key in memory, validating the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// or leaves the config invalid. `self` is unchanged on error.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Check values that serde alone cannot.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.day_window()?;
        if self.grid.slot_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "grid.slot_minutes".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// The configured daily window.
    pub fn day_window(&self) -> std::result::Result<DayWindow, ConfigError> {
        DayWindow::parse(&self.window.start, &self.window.end).map_err(|e| {
            ConfigError::InvalidValue {
                key: "window".into(),
                message: e.to_string(),
            }
        })
    }

    /// Free-interval deriver for the configured window.
    pub fn deriver(&self) -> Result<FreeIntervalDeriver> {
        Ok(FreeIntervalDeriver::new(self.day_window()?).with_min_gap(self.window.min_free_minutes))
    }

    /// Allocator using the configured targets, aligned to the grid rows.
    pub fn allocator(&self) -> WeeklyAllocator {
        WeeklyAllocator::with_config(SchedulerConfig {
            targets: self.targets.hours.clone(),
            max_daily_minutes: (self.targets.max_daily_minutes > 0)
                .then_some(self.targets.max_daily_minutes),
            slot_minutes: self.grid.slot_minutes,
            slot_origin: self
                .day_window()
                .map(|w| w.start)
                .unwrap_or(TimeOfDay::MIDNIGHT),
        })
    }

    /// Grid builder using the configured window, resolution and palette.
    pub fn grid_builder(&self) -> Result<GridBuilder> {
        Ok(GridBuilder::new(self.day_window()?)
            .with_slot_minutes(self.grid.slot_minutes)
            .with_palette(self.grid.palette.clone()))
    }
}
