//! Configuration for the slot engine, loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use crate::model::{AvailabilityWindow, MINUTES_PER_DAY};
use crate::weekday::IsoWeekday;

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub engine: EngineSection,
    pub limits: Limits,
    pub defaults: DefaultWindows,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SlotError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| SlotError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let l = &self.limits;
        if l.min_duration_minutes == 0 || l.min_interval_minutes == 0 {
            return Err(SlotError::Config(
                "minimum duration and interval must be > 0".to_string(),
            ));
        }
        if l.min_duration_minutes > l.max_duration_minutes {
            return Err(SlotError::Config(
                "limits.min_duration_minutes exceeds limits.max_duration_minutes".to_string(),
            ));
        }
        if l.min_interval_minutes > l.max_interval_minutes {
            return Err(SlotError::Config(
                "limits.min_interval_minutes exceeds limits.max_interval_minutes".to_string(),
            ));
        }

        let d = &self.defaults;
        if d.weekdays.iter().any(|&w| IsoWeekday::from_index(w).is_none()) {
            return Err(SlotError::Config(
                "defaults.weekdays must be within 0..=6 (Monday = 0)".to_string(),
            ));
        }
        if d.start_minute >= d.end_minute || d.end_minute > MINUTES_PER_DAY {
            return Err(SlotError::Config(format!(
                "defaults window must satisfy start < end <= {}",
                MINUTES_PER_DAY
            )));
        }

        Ok(())
    }
}

/// Engine behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    pub dst_policy: DstPolicy,
    /// Deadline for external calendar lookups in milliseconds. 0 disables it.
    pub external_timeout_ms: u64,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            dst_policy: DstPolicy::default(),
            external_timeout_ms: 2000,
        }
    }
}

/// Bounds applied when hosts create event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub min_duration_minutes: u32,
    pub max_duration_minutes: u32,
    pub min_interval_minutes: u32,
    pub max_interval_minutes: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_duration_minutes: 15,
            max_duration_minutes: 180,
            min_interval_minutes: 15,
            max_interval_minutes: 120,
        }
    }
}

/// Weekly windows seeded for a host who has none when their first event type
/// is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultWindows {
    /// Stored weekday indices, Monday = 0.
    pub weekdays: Vec<u8>,
    pub start_minute: u32,
    pub end_minute: u32,
}

impl Default for DefaultWindows {
    fn default() -> Self {
        Self {
            weekdays: vec![0, 1, 2, 3, 4],
            start_minute: 9 * 60,
            end_minute: 17 * 60,
        }
    }
}

impl DefaultWindows {
    /// Build the seed windows for `host_id`. Out-of-range weekdays are skipped.
    pub fn windows_for(&self, host_id: &str) -> Vec<AvailabilityWindow> {
        self.weekdays
            .iter()
            .filter_map(|&w| IsoWeekday::from_index(w))
            .map(|day| AvailabilityWindow::new(host_id, day, self.start_minute, self.end_minute))
            .collect()
    }
}
