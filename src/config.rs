//! Startup configuration for the Tagbot core
//!
//! Every field has a default matching the calibrated robot, so an empty
//! JSON object (or no file at all) gives a working configuration.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagConfig {
    #[serde(default)]
    pub drive: DriveConfig,
    #[serde(default)]
    pub seek: SeekConfig,
    #[serde(default)]
    pub wander: WanderConfig,
    #[serde(default)]
    pub behaviors: BehaviorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_left_motor_port() -> String {
    "outA".to_string()
}

fn default_right_motor_port() -> String {
    "outD".to_string()
}

fn default_turn_duration_ms() -> u64 {
    2_000
}

fn default_proximity_threshold_cm() -> f64 {
    10.0
}

fn default_breach_count_threshold() -> u32 {
    3
}

fn default_seek_speed() -> u8 {
    50
}

fn default_seek_drive_duration_ms() -> u64 {
    2_000
}

fn default_seek_poll_interval_ms() -> u64 {
    200
}

fn default_min_duration_secs() -> u64 {
    1
}

fn default_max_duration_secs() -> u64 {
    5
}

fn default_wander_speeds() -> Vec<u8> {
    vec![25, 50, 75, 100]
}

fn default_idle_poll_interval_ms() -> u64 {
    1_000
}

fn default_command_speed() -> u8 {
    50
}

fn default_logging_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    #[serde(default = "default_left_motor_port")]
    pub left_motor_port: String,
    #[serde(default = "default_right_motor_port")]
    pub right_motor_port: String,
    /// How long the pivot before a left/right move lasts.
    /// Calibrated for a hard smooth surface.
    #[serde(default = "default_turn_duration_ms")]
    pub turn_duration_ms: u64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            left_motor_port: default_left_motor_port(),
            right_motor_port: default_right_motor_port(),
            turn_duration_ms: default_turn_duration_ms(),
        }
    }
}

impl DriveConfig {
    pub fn turn_duration(&self) -> Duration {
        Duration::from_millis(self.turn_duration_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeekConfig {
    #[serde(default = "default_proximity_threshold_cm")]
    pub proximity_threshold_cm: f64,
    /// Consecutive close samples must exceed this count to confirm a breach
    #[serde(default = "default_breach_count_threshold")]
    pub breach_count_threshold: u32,
    #[serde(default = "default_seek_speed")]
    pub speed: u8,
    #[serde(default = "default_seek_drive_duration_ms")]
    pub drive_duration_ms: u64,
    #[serde(default = "default_seek_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for SeekConfig {
    fn default() -> Self {
        Self {
            proximity_threshold_cm: default_proximity_threshold_cm(),
            breach_count_threshold: default_breach_count_threshold(),
            speed: default_seek_speed(),
            drive_duration_ms: default_seek_drive_duration_ms(),
            poll_interval_ms: default_seek_poll_interval_ms(),
        }
    }
}

impl SeekConfig {
    pub fn drive_duration(&self) -> Duration {
        Duration::from_millis(self.drive_duration_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WanderConfig {
    #[serde(default = "default_min_duration_secs")]
    pub min_duration_secs: u64,
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,
    #[serde(default = "default_wander_speeds")]
    pub speeds: Vec<u8>,
    /// Fixed seed for a reproducible evasive path
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            min_duration_secs: default_min_duration_secs(),
            max_duration_secs: default_max_duration_secs(),
            speeds: default_wander_speeds(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// How often an inactive behavior loop re-checks its mode flag
    #[serde(default = "default_idle_poll_interval_ms")]
    pub idle_poll_interval_ms: u64,
    /// Speed used by preset commands that carry no speed of their own
    #[serde(default = "default_command_speed")]
    pub default_command_speed: u8,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            idle_poll_interval_ms: default_idle_poll_interval_ms(),
            default_command_speed: default_command_speed(),
        }
    }
}

impl BehaviorConfig {
    pub fn idle_poll_interval(&self) -> Duration {
        Duration::from_millis(self.idle_poll_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_logging_filter(),
        }
    }
}

impl TagConfig {
    /// Read and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_json_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: TagConfig =
            serde_json::from_str(text).context("failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.seek.proximity_threshold_cm > 0.0) {
            bail!(
                "seek.proximity_threshold_cm must be positive, got {}",
                self.seek.proximity_threshold_cm
            );
        }
        if self.seek.speed > 100 {
            bail!("seek.speed must be at most 100, got {}", self.seek.speed);
        }
        if self.seek.poll_interval_ms == 0 {
            bail!("seek.poll_interval_ms cannot be zero");
        }
        if self.wander.min_duration_secs == 0 {
            bail!("wander.min_duration_secs must be at least 1");
        }
        if self.wander.min_duration_secs > self.wander.max_duration_secs {
            bail!(
                "wander duration range is inverted: {}..={}",
                self.wander.min_duration_secs,
                self.wander.max_duration_secs
            );
        }
        if self.wander.speeds.is_empty() {
            bail!("wander.speeds cannot be empty");
        }
        if let Some(speed) = self.wander.speeds.iter().find(|speed| **speed > 100) {
            bail!("wander.speeds entries must be at most 100, got {}", speed);
        }
        if self.behaviors.idle_poll_interval_ms == 0 {
            bail!("behaviors.idle_poll_interval_ms cannot be zero");
        }
        if self.behaviors.default_command_speed > 100 {
            bail!(
                "behaviors.default_command_speed must be at most 100, got {}",
                self.behaviors.default_command_speed
            );
        }
        if self.logging.filter.trim().is_empty() {
            bail!("logging.filter cannot be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_calibrated_defaults() {
        let config = TagConfig::from_json_str("{}").unwrap();
        assert_eq!(config.drive.left_motor_port, "outA");
        assert_eq!(config.drive.right_motor_port, "outD");
        assert_eq!(config.seek.proximity_threshold_cm, 10.0);
        assert_eq!(config.seek.breach_count_threshold, 3);
        assert_eq!(config.wander.speeds, vec![25, 50, 75, 100]);
        assert_eq!(config.behaviors.idle_poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config =
            TagConfig::from_json_str(r#"{"seek": {"proximity_threshold_cm": 25.5}}"#).unwrap();
        assert_eq!(config.seek.proximity_threshold_cm, 25.5);
        assert_eq!(config.seek.poll_interval(), Duration::from_millis(200));
    }

    #[test]
    fn rejects_inverted_wander_range() {
        let err = TagConfig::from_json_str(
            r#"{"wander": {"min_duration_secs": 6, "max_duration_secs": 2}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("inverted"));
    }

    #[test]
    fn rejects_out_of_range_wander_speed() {
        assert!(TagConfig::from_json_str(r#"{"wander": {"speeds": [50, 120]}}"#).is_err());
        assert!(TagConfig::from_json_str(r#"{"wander": {"speeds": []}}"#).is_err());
    }
}
