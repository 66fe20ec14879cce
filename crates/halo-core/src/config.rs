//! Radar tunables.
//!
//! `RadarConfig` is a plain snapshot of every setting. The host owns the
//! live copy (see `ConfigSource` in `halo-tracker`) and announces changes
//! by `ConfigKey`, so consumers only react to the settings they care about.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{RadarError, Result};

/// Snapshot of all radar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// Radius of the radar footprint on the horizontal plane (meters).
    pub radar_range: f32,
    /// Minimum time between full scans (seconds). Also drives the fade.
    pub scan_interval: f32,
    /// Loot priced below this value is never tracked.
    pub loot_threshold: u32,
    /// Distance compression parameter; exponent = 0.4 + scale² / 2.
    pub distance_scale: f32,
    /// Multiplier on the observer-height band used for above/below markers.
    pub height_threshold: f32,
    /// Keep dead enemies on the radar.
    pub show_corpses: bool,
    /// Hide living enemies that are not in or recently out of combat.
    pub combat_filter: bool,
    /// Track valuable loot.
    pub enable_loot: bool,
    /// Run the disc pulse animation.
    pub enable_pulse: bool,
    /// Blip size multiplier.
    pub blip_size: f32,
    /// HUD scale multiplier.
    pub radar_size: f32,
    /// HUD horizontal offset (pixels).
    pub offset_x: f32,
    /// HUD vertical offset (pixels).
    pub offset_y: f32,
}

/// Name of one tunable, used in change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigKey {
    RadarRange,
    ScanInterval,
    LootThreshold,
    DistanceScale,
    HeightThreshold,
    ShowCorpses,
    CombatFilter,
    EnableLoot,
    EnablePulse,
    BlipSize,
    RadarSize,
    OffsetX,
    OffsetY,
}

/// A typed new value for one setting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value")]
pub enum ConfigValue {
    RadarRange(f32),
    ScanInterval(f32),
    LootThreshold(u32),
    DistanceScale(f32),
    HeightThreshold(f32),
    ShowCorpses(bool),
    CombatFilter(bool),
    EnableLoot(bool),
    EnablePulse(bool),
    BlipSize(f32),
    RadarSize(f32),
    OffsetX(f32),
    OffsetY(f32),
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            radar_range: DEFAULT_RADAR_RANGE,
            scan_interval: DEFAULT_SCAN_INTERVAL_SECS,
            loot_threshold: DEFAULT_LOOT_THRESHOLD,
            distance_scale: DEFAULT_DISTANCE_SCALE,
            height_threshold: DEFAULT_HEIGHT_THRESHOLD,
            show_corpses: true,
            combat_filter: false,
            enable_loot: false,
            enable_pulse: true,
            blip_size: DEFAULT_BLIP_SIZE,
            radar_size: DEFAULT_RADAR_SIZE,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl RadarConfig {
    /// Parse a config from TOML. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RadarConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject settings that would make range or fade math meaningless.
    pub fn validate(&self) -> Result<()> {
        check_positive(ConfigKey::RadarRange, self.radar_range)?;
        check_positive(ConfigKey::ScanInterval, self.scan_interval)?;
        check_finite(ConfigKey::DistanceScale, self.distance_scale)?;
        check_finite(ConfigKey::HeightThreshold, self.height_threshold)?;
        check_positive(ConfigKey::BlipSize, self.blip_size)?;
        check_positive(ConfigKey::RadarSize, self.radar_size)?;
        Ok(())
    }

    /// Apply one change. Returns the key so the caller can broadcast it.
    pub fn set(&mut self, value: ConfigValue) -> ConfigKey {
        match value {
            ConfigValue::RadarRange(v) => self.radar_range = v,
            ConfigValue::ScanInterval(v) => self.scan_interval = v,
            ConfigValue::LootThreshold(v) => self.loot_threshold = v,
            ConfigValue::DistanceScale(v) => self.distance_scale = v,
            ConfigValue::HeightThreshold(v) => self.height_threshold = v,
            ConfigValue::ShowCorpses(v) => self.show_corpses = v,
            ConfigValue::CombatFilter(v) => self.combat_filter = v,
            ConfigValue::EnableLoot(v) => self.enable_loot = v,
            ConfigValue::EnablePulse(v) => self.enable_pulse = v,
            ConfigValue::BlipSize(v) => self.blip_size = v,
            ConfigValue::RadarSize(v) => self.radar_size = v,
            ConfigValue::OffsetX(v) => self.offset_x = v,
            ConfigValue::OffsetY(v) => self.offset_y = v,
        }
        value.key()
    }

    /// Period of one pulse sweep. Never shorter than one second.
    pub fn pulse_interval(&self) -> f32 {
        self.scan_interval.max(PULSE_MIN_INTERVAL_SECS)
    }

    /// Rendered blip scale.
    pub fn blip_scale(&self) -> f32 {
        self.blip_size * BLIP_SIZE_FACTOR
    }
}

impl ConfigKey {
    /// Settings whose change invalidates the loot index.
    pub fn affects_loot_index(&self) -> bool {
        matches!(self, ConfigKey::EnableLoot | ConfigKey::LootThreshold)
    }

    /// Settings the pulse animation task listens to.
    pub fn affects_pulse(&self) -> bool {
        matches!(self, ConfigKey::EnablePulse | ConfigKey::ScanInterval)
    }
}

impl ConfigValue {
    pub fn key(&self) -> ConfigKey {
        match self {
            ConfigValue::RadarRange(_) => ConfigKey::RadarRange,
            ConfigValue::ScanInterval(_) => ConfigKey::ScanInterval,
            ConfigValue::LootThreshold(_) => ConfigKey::LootThreshold,
            ConfigValue::DistanceScale(_) => ConfigKey::DistanceScale,
            ConfigValue::HeightThreshold(_) => ConfigKey::HeightThreshold,
            ConfigValue::ShowCorpses(_) => ConfigKey::ShowCorpses,
            ConfigValue::CombatFilter(_) => ConfigKey::CombatFilter,
            ConfigValue::EnableLoot(_) => ConfigKey::EnableLoot,
            ConfigValue::EnablePulse(_) => ConfigKey::EnablePulse,
            ConfigValue::BlipSize(_) => ConfigKey::BlipSize,
            ConfigValue::RadarSize(_) => ConfigKey::RadarSize,
            ConfigValue::OffsetX(_) => ConfigKey::OffsetX,
            ConfigValue::OffsetY(_) => ConfigKey::OffsetY,
        }
    }
}

fn check_finite(key: ConfigKey, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RadarError::InvalidSetting {
            key: format!("{key:?}"),
            reason: format!("must be finite, got {value}"),
        })
    }
}

fn check_positive(key: ConfigKey, value: f32) -> Result<()> {
    check_finite(key, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(RadarError::InvalidSetting {
            key: format!("{key:?}"),
            reason: format!("must be positive, got {value}"),
        })
    }
}
