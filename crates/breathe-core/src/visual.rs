//! Phase to orb scale mapping.

use crate::pattern::BreathingPattern;
use crate::phase::{phase_duration_ms, Phase};

/// Scale reached at the end of the main inhale when a second inhale follows
pub const INHALE2_START_SCALE: f32 = 0.75;

/// Largest f32 below 1.0
const BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

/// What the UI needs to animate the orb for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseVisualState {
    pub phase: Phase,
    /// Elapsed fraction of the current phase (0-1)
    pub progress: f32,
    /// Orb size factor (0-1)
    pub scale: f32,
}

impl PhaseVisualState {
    pub const IDLE: PhaseVisualState = PhaseVisualState {
        phase: Phase::Idle,
        progress: 0.0,
        scale: 0.0,
    };
}

impl Default for PhaseVisualState {
    fn default() -> Self {
        Self::IDLE
    }
}

/// Derive progress and scale from the phase tuple. No hidden state.
pub fn visual_state(
    phase: Phase,
    elapsed_ms: f64,
    pattern: &BreathingPattern,
    speed_multiplier: f64,
) -> PhaseVisualState {
    if phase == Phase::Idle {
        return PhaseVisualState::IDLE;
    }

    let duration_ms = phase_duration_ms(phase, pattern, speed_multiplier);
    let progress = if duration_ms <= 0.0 {
        0.0
    } else if elapsed_ms < duration_ms {
        // f32 rounding must not report a finished phase early
        ((elapsed_ms / duration_ms).max(0.0) as f32).min(BELOW_ONE)
    } else {
        1.0
    };

    let scale = match phase {
        Phase::Inhale => {
            let max_scale = if pattern.has_inhale2() {
                INHALE2_START_SCALE
            } else {
                1.0
            };
            progress * max_scale
        }
        Phase::Inhale2 => INHALE2_START_SCALE + progress * (1.0 - INHALE2_START_SCALE),
        Phase::HoldIn => 1.0,
        Phase::Exhale => 1.0 - progress,
        Phase::HoldOut | Phase::Idle => 0.0,
    };

    PhaseVisualState {
        phase,
        progress,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_idle_is_zero() {
        let pattern = BreathingPattern::new("box", 4.0, 0.0, 4.0, 4.0, 4.0);
        assert_eq!(visual_state(Phase::Idle, 1234.0, &pattern, 1.0), PhaseVisualState::IDLE);
    }

    #[test]
    fn test_progress_bounds() {
        let pattern = BreathingPattern::new("box", 4.0, 0.0, 4.0, 4.0, 4.0);
        assert_eq!(visual_state(Phase::Inhale, 0.0, &pattern, 1.0).progress, 0.0);
        assert!(visual_state(Phase::Inhale, 3999.0, &pattern, 1.0).progress < 1.0);
        assert_eq!(visual_state(Phase::Inhale, 4000.0, &pattern, 1.0).progress, 1.0);
        assert_eq!(visual_state(Phase::Inhale, 9000.0, &pattern, 1.0).progress, 1.0);
    }

    #[test]
    fn test_zero_duration_progress_is_zero() {
        let pattern = BreathingPattern::new("relax", 4.0, 0.0, 7.0, 8.0, 0.0);
        let state = visual_state(Phase::HoldOut, 100.0, &pattern, 1.0);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.scale, 0.0);
    }

    #[test]
    fn test_coherent_scale_rises_and_falls() {
        let pattern = BreathingPattern::new("coherent", 5.5, 0.0, 0.0, 5.5, 0.0);

        assert!(approx(visual_state(Phase::Inhale, 0.0, &pattern, 1.0).scale, 0.0));
        assert!(approx(visual_state(Phase::Inhale, 2750.0, &pattern, 1.0).scale, 0.5));
        assert!(approx(visual_state(Phase::Inhale, 5500.0, &pattern, 1.0).scale, 1.0));
        assert!(approx(visual_state(Phase::Exhale, 0.0, &pattern, 1.0).scale, 1.0));
        assert!(approx(visual_state(Phase::Exhale, 2750.0, &pattern, 1.0).scale, 0.5));
        assert!(approx(visual_state(Phase::Exhale, 5500.0, &pattern, 1.0).scale, 0.0));
    }

    #[test]
    fn test_inhale2_shares_the_rise() {
        let pattern = BreathingPattern::new("double", 4.0, 2.0, 0.0, 6.0, 0.0);

        assert!(approx(visual_state(Phase::Inhale, 4000.0, &pattern, 1.0).scale, 0.75));
        assert!(approx(visual_state(Phase::Inhale2, 0.0, &pattern, 1.0).scale, 0.75));
        assert!(approx(visual_state(Phase::Inhale2, 1000.0, &pattern, 1.0).scale, 0.875));
        assert!(approx(visual_state(Phase::Inhale2, 2000.0, &pattern, 1.0).scale, 1.0));
    }

    #[test]
    fn test_holds_are_flat() {
        let pattern = BreathingPattern::new("box", 4.0, 0.0, 4.0, 4.0, 4.0);
        for elapsed in [0.0, 1000.0, 4000.0] {
            assert_eq!(visual_state(Phase::HoldIn, elapsed, &pattern, 1.0).scale, 1.0);
            assert_eq!(visual_state(Phase::HoldOut, elapsed, &pattern, 1.0).scale, 0.0);
        }
    }

    #[test]
    fn test_speed_stretches_progress() {
        let pattern = BreathingPattern::new("box", 4.0, 0.0, 4.0, 4.0, 4.0);
        let slow = visual_state(Phase::Inhale, 4000.0, &pattern, 2.0);
        assert!(approx(slow.progress, 0.5));
    }

    #[test]
    fn test_progress_below_one_until_duration() {
        let pattern = BreathingPattern::new("box", 4.0, 0.0, 4.0, 4.0, 4.0);
        for elapsed in [3999.9, 3999.9999, 3999.999_999_9] {
            let state = visual_state(Phase::Inhale, elapsed, &pattern, 1.0);
            assert!(state.progress < 1.0, "progress 1.0 at {}ms", elapsed);
            assert!(state.scale < 1.0);
        }
        assert_eq!(visual_state(Phase::Inhale, 4000.0, &pattern, 1.0).progress, 1.0);
        assert_eq!(visual_state(Phase::Exhale, 3999.9999, &pattern, 1.0).scale, f32::EPSILON / 2.0);
    }
}
