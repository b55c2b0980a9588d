//! Breathing pattern records.
//!
//! A pattern is the timing of one breathing technique plus the color the
//! visualizer paints it with. Patterns are immutable once loaded and shared
//! behind `Arc` between the registry and any running session.

use serde::{Deserialize, Serialize};

use crate::error::PatternError;
use crate::phase::Phase;

/// Display color of a pattern (8-bit sRGB)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Color channels as 0.0-1.0 floats
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        ]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb(120, 180, 255)
    }
}

/// Phase timings of one breathing technique, in seconds.
///
/// A duration of exactly zero skips that phase. `inhale2` is the optional
/// "top-up" inhale that follows the main inhale.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BreathingPattern {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "inhale")]
    pub inhale_secs: f64,
    #[serde(rename = "inhale2", default)]
    pub inhale2_secs: f64,
    #[serde(rename = "hold_in", default)]
    pub hold_in_secs: f64,
    #[serde(rename = "exhale")]
    pub exhale_secs: f64,
    #[serde(rename = "hold_out", default)]
    pub hold_out_secs: f64,
    #[serde(default)]
    pub color: Rgb,
    #[serde(default)]
    pub description: String,
}

impl BreathingPattern {
    pub fn new(
        name: impl Into<String>,
        inhale: f64,
        inhale2: f64,
        hold_in: f64,
        exhale: f64,
        hold_out: f64,
    ) -> Self {
        Self {
            name: name.into(),
            inhale_secs: inhale,
            inhale2_secs: inhale2,
            hold_in_secs: hold_in,
            exhale_secs: exhale,
            hold_out_secs: hold_out,
            color: Rgb::default(),
            description: String::new(),
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Configured seconds for a phase. `Idle` has no duration.
    pub fn seconds(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Inhale => self.inhale_secs,
            Phase::Inhale2 => self.inhale2_secs,
            Phase::HoldIn => self.hold_in_secs,
            Phase::Exhale => self.exhale_secs,
            Phase::HoldOut => self.hold_out_secs,
            Phase::Idle => 0.0,
        }
    }

    pub fn has_inhale2(&self) -> bool {
        self.inhale2_secs > 0.0
    }

    /// Length of one full cycle at normal speed
    pub fn cycle_secs(&self) -> f64 {
        self.inhale_secs
            + self.inhale2_secs
            + self.hold_in_secs
            + self.exhale_secs
            + self.hold_out_secs
    }

    pub fn breaths_per_minute(&self) -> f64 {
        let cycle = self.cycle_secs();
        if cycle > 0.0 {
            60.0 / cycle
        } else {
            0.0
        }
    }

    /// Check the durations before the pattern is handed to a session.
    ///
    /// The phase engine itself never validates; this is the load-time gate.
    pub fn validate(&self) -> Result<(), PatternError> {
        let fields = [
            ("inhale", self.inhale_secs),
            ("inhale2", self.inhale2_secs),
            ("hold_in", self.hold_in_secs),
            ("exhale", self.exhale_secs),
            ("hold_out", self.hold_out_secs),
        ];

        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(PatternError::InvalidDuration {
                    pattern: self.name.clone(),
                    field,
                    value,
                });
            }
        }

        if self.inhale_secs == 0.0 && self.exhale_secs == 0.0 {
            return Err(PatternError::Empty(self.name.clone()));
        }

        Ok(())
    }
}
