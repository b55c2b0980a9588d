//! Configuration file management.
//!
//! Handles loading and saving user preferences to `~/.breathe.toml`.

use breathe_core::{BreathingPattern, PatternRegistry, SpeedRange, DEFAULT_MODE, DEFAULT_POPULATION};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

const DEFAULT_CUE_DIR: &str = "assets/cues";
const DEFAULT_CUE_VOLUME: f32 = 0.8;

const CONFIG_TEMPLATE: &str = r#"# breathe configuration file

# Breathing mode to start with (auto-saved)
# mode = "box"

# Phase length multiplier: 2.0 makes every phase twice as long (auto-saved)
# speed = 1.0
# speed_min = 0.5
# speed_max = 2.0
# speed_step = 0.1

# Particles in the background field
# particle_count = 80

# =============================================================================
# Audio cues
# =============================================================================
# Directory holding inhale.wav, exhale.wav and hold.wav
# cue_dir = "assets/cues"
# cue_volume = 0.8
# muted = false

# =============================================================================
# Custom patterns
# =============================================================================
# Durations in seconds; 0 (or omitted) skips a phase. A custom pattern with
# the same name as a built-in replaces it.

# [patterns.square-slow]
# name = "Slow square"
# inhale = 6
# hold_in = 6
# exhale = 6
# hold_out = 6
# color = [90, 160, 220]
# description = "Box breathing, stretched"

# [patterns.double-in]
# inhale = 3
# inhale2 = 1
# exhale = 6
"#;

#[derive(Serialize, Deserialize, Default)]
pub struct Config {
    pub mode: Option<String>,
    pub speed: Option<f64>,
    pub speed_min: Option<f64>,
    pub speed_max: Option<f64>,
    pub speed_step: Option<f64>,
    pub particle_count: Option<usize>,

    pub cue_dir: Option<PathBuf>,
    pub cue_volume: Option<f32>,
    pub muted: Option<bool>,

    pub patterns: Option<HashMap<String, BreathingPattern>>,
}

impl Config {
    fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".breathe.toml"))
    }

    pub fn load() -> Self {
        let path = match Self::path() {
            Some(p) => p,
            None => return Self::default(),
        };

        // Create template file if it doesn't exist
        if !path.exists() {
            match fs::write(&path, CONFIG_TEMPLATE) {
                Ok(()) => info!("Created config template at {:?}", path),
                Err(e) => warn!("Could not write config template {:?}: {}", path, e),
            }
        }

        let content = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(_) => return Self::default(),
        };

        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if let Some(path) = Self::path() {
            match toml::to_string(self) {
                Ok(content) => match fs::write(&path, &content) {
                    Ok(()) => info!("Config saved to {:?}", path),
                    Err(e) => warn!("Could not save config {:?}: {}", path, e),
                },
                Err(e) => warn!("Could not serialize config: {}", e),
            }
        }
    }

    pub fn mode(&self) -> &str {
        self.mode.as_deref().unwrap_or(DEFAULT_MODE)
    }

    pub fn speed_range(&self) -> SpeedRange {
        let defaults = SpeedRange::default();
        let min = self.speed_min.unwrap_or(defaults.min);
        let max = self.speed_max.unwrap_or(defaults.max);
        if !(min > 0.0 && min <= max) {
            warn!("Invalid speed range [{}, {}], using defaults", min, max);
            return defaults;
        }
        SpeedRange {
            min,
            max,
            step: self.speed_step.filter(|s| *s > 0.0).unwrap_or(defaults.step),
        }
    }

    /// Saved speed, clamped into the configured range
    pub fn speed(&self) -> f64 {
        self.speed_range().clamp(self.speed.unwrap_or(1.0))
    }

    pub fn particle_count(&self) -> usize {
        self.particle_count.unwrap_or(DEFAULT_POPULATION)
    }

    pub fn cue_dir(&self) -> PathBuf {
        self.cue_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CUE_DIR))
    }

    pub fn cue_volume(&self) -> f32 {
        self.cue_volume.unwrap_or(DEFAULT_CUE_VOLUME).clamp(0.0, 1.0)
    }

    pub fn muted(&self) -> bool {
        self.muted.unwrap_or(false)
    }

    /// Built-in patterns merged with the custom ones from this file.
    ///
    /// Invalid custom patterns are dropped one by one rather than discarding
    /// the whole table.
    pub fn registry(&self) -> PatternRegistry {
        let Some(custom) = self.patterns.as_ref() else {
            return PatternRegistry::builtin();
        };

        let valid: HashMap<String, BreathingPattern> = custom
            .iter()
            .filter(|(mode, pattern)| match pattern.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!("Skipping custom pattern '{}': {}", mode, e);
                    false
                }
            })
            .map(|(mode, pattern)| (mode.clone(), pattern.clone()))
            .collect();

        PatternRegistry::with_overrides(&valid).unwrap_or_else(|e| {
            warn!("Custom patterns ignored: {}", e);
            PatternRegistry::builtin()
        })
    }

    pub fn set_mode(&mut self, mode: &str) {
        self.mode = Some(mode.to_string());
        self.save();
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = Some(speed);
        self.save();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = Some(muted);
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_defaults() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.mode(), DEFAULT_MODE);
        assert_eq!(config.speed(), 1.0);
        assert_eq!(config.particle_count(), DEFAULT_POPULATION);
        assert_eq!(config.cue_dir(), PathBuf::from(DEFAULT_CUE_DIR));
        assert!(!config.muted());
    }

    #[test]
    fn test_speed_clamped_to_range() {
        let config: Config = toml::from_str("speed = 9.0\nspeed_max = 3.0").unwrap();
        assert_eq!(config.speed(), 3.0);

        let inverted: Config = toml::from_str("speed_min = 2.0\nspeed_max = 1.0").unwrap();
        assert_eq!(inverted.speed_range(), SpeedRange::default());
    }

    #[test]
    fn test_custom_patterns_merge_and_skip_invalid() {
        let config: Config = toml::from_str(
            r#"
            [patterns.slow]
            inhale = 6
            exhale = 8

            [patterns.broken]
            inhale = -2
            exhale = 4
            "#,
        )
        .unwrap();

        let registry = config.registry();
        let slow = registry.get("slow").unwrap();
        assert_eq!(slow.name, "slow");
        assert_eq!(slow.cycle_secs(), 14.0);
        assert!(!registry.contains("broken"));
        assert!(registry.contains("box"));
    }
}
