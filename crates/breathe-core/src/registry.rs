//! Pattern registry: mode id to breathing pattern.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::error::PatternError;
use crate::pattern::{BreathingPattern, Rgb};

pub const DEFAULT_MODE: &str = "box";

/// Immutable lookup of the patterns a session can run
#[derive(Clone, Debug)]
pub struct PatternRegistry {
    patterns: BTreeMap<String, Arc<BreathingPattern>>,
}

impl PatternRegistry {
    /// Built-in catalog
    pub fn builtin() -> Self {
        let entries = [
            (
                "box",
                BreathingPattern::new("Box", 4.0, 0.0, 4.0, 4.0, 4.0)
                    .with_color(Rgb(86, 156, 214))
                    .with_description("Equal sides: in, hold, out, hold. Steadies focus."),
            ),
            (
                "relax",
                BreathingPattern::new("Relax", 4.0, 0.0, 7.0, 8.0, 0.0)
                    .with_color(Rgb(155, 120, 220))
                    .with_description("4-7-8. A long exhale that settles the nervous system."),
            ),
            (
                "coherent",
                BreathingPattern::new("Coherent", 5.5, 0.0, 0.0, 5.5, 0.0)
                    .with_color(Rgb(80, 200, 160))
                    .with_description("Around 5.5 breaths a minute for heart-rate coherence."),
            ),
            (
                "calm",
                BreathingPattern::new("Calm", 4.0, 0.0, 0.0, 6.0, 0.0)
                    .with_color(Rgb(110, 190, 230))
                    .with_description("Exhale longer than you inhale."),
            ),
            (
                "sigh",
                BreathingPattern::new("Physiological sigh", 2.0, 1.0, 0.0, 6.0, 0.0)
                    .with_color(Rgb(240, 170, 90))
                    .with_description("Double inhale through the nose, long sigh out."),
            ),
            (
                "triangle",
                BreathingPattern::new("Triangle", 4.0, 0.0, 4.0, 4.0, 0.0)
                    .with_color(Rgb(230, 120, 140))
                    .with_description("In, hold, out. A gentler box."),
            ),
            (
                "deep",
                BreathingPattern::new("Deep", 5.0, 0.0, 2.0, 7.0, 2.0)
                    .with_color(Rgb(70, 110, 200))
                    .with_description("Slow and full, with short pauses at both ends."),
            ),
        ];

        Self {
            patterns: entries
                .into_iter()
                .map(|(mode, pattern)| (mode.to_string(), Arc::new(pattern)))
                .collect(),
        }
    }

    /// Built-ins plus user patterns; a user pattern replaces a built-in of
    /// the same mode. Every user pattern is validated first.
    pub fn with_overrides(
        overrides: &HashMap<String, BreathingPattern>,
    ) -> Result<Self, PatternError> {
        let mut registry = Self::builtin();
        for (mode, pattern) in overrides {
            let mut pattern = pattern.clone();
            if pattern.name.is_empty() {
                pattern.name = mode.clone();
            }
            pattern.validate()?;
            registry.patterns.insert(mode.clone(), Arc::new(pattern));
        }
        Ok(registry)
    }

    pub fn get(&self, mode: &str) -> Option<Arc<BreathingPattern>> {
        self.patterns.get(mode).cloned()
    }

    /// Like [`get`](Self::get) but reports the unknown mode
    pub fn require(&self, mode: &str) -> Result<Arc<BreathingPattern>, PatternError> {
        self.get(mode)
            .ok_or_else(|| PatternError::UnknownMode(mode.to_string()))
    }

    pub fn contains(&self, mode: &str) -> bool {
        self.patterns.contains_key(mode)
    }

    /// Mode ids in sorted order
    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Mode after `current` in sorted order, wrapping around
    pub fn next_mode(&self, current: &str) -> Option<&str> {
        self.step_mode(current, 1)
    }

    /// Mode before `current` in sorted order, wrapping around
    pub fn prev_mode(&self, current: &str) -> Option<&str> {
        self.step_mode(current, -1)
    }

    fn step_mode(&self, current: &str, step: isize) -> Option<&str> {
        let modes: Vec<&str> = self.modes().collect();
        if modes.is_empty() {
            return None;
        }
        let idx = modes.iter().position(|m| *m == current).unwrap_or(0) as isize;
        let len = modes.len() as isize;
        Some(modes[(idx + step).rem_euclid(len) as usize])
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
