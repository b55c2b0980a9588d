//! Phase engine.
//!
//! Pure arithmetic over a [`BreathingPattern`]: how long a phase lasts at a
//! given speed, which phase follows it, and whether a phase has run its
//! course. [`PhaseCycleState`] is the only mutable piece and is owned by a
//! running session.

use crate::pattern::BreathingPattern;

/// One stage of the breathing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Inhale,
    Inhale2,
    HoldIn,
    Exhale,
    HoldOut,
    /// Resting state before a session starts or after it stops
    Idle,
}

impl Phase {
    /// Every phase of the cycle in order (excludes `Idle`)
    pub const CYCLE: [Phase; 5] = [
        Phase::Inhale,
        Phase::Inhale2,
        Phase::HoldIn,
        Phase::Exhale,
        Phase::HoldOut,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Inhale => "Breathe in",
            Phase::Inhale2 => "Breathe in more",
            Phase::HoldIn => "Hold",
            Phase::Exhale => "Breathe out",
            Phase::HoldOut => "Hold",
            Phase::Idle => "Ready",
        }
    }

    pub fn is_inhale(self) -> bool {
        matches!(self, Phase::Inhale | Phase::Inhale2)
    }

    pub fn is_hold(self) -> bool {
        matches!(self, Phase::HoldIn | Phase::HoldOut)
    }
}

/// Duration of `phase` in milliseconds: `seconds × speed × 1000`.
pub fn phase_duration_ms(phase: Phase, pattern: &BreathingPattern, speed_multiplier: f64) -> f64 {
    match phase {
        Phase::Idle => 0.0,
        _ => pattern.seconds(phase) * speed_multiplier * 1000.0,
    }
}

/// The phase that follows `phase`, skipping optional phases configured as zero.
///
/// `Inhale` and `Exhale` are always part of the cycle; `Inhale2`, `HoldIn` and
/// `HoldOut` only when their duration is nonzero.
pub fn next_phase(phase: Phase, pattern: &BreathingPattern) -> Phase {
    let hold_in_or_exhale = || {
        if pattern.hold_in_secs > 0.0 {
            Phase::HoldIn
        } else {
            Phase::Exhale
        }
    };

    match phase {
        Phase::Idle => Phase::Inhale,
        Phase::Inhale => {
            if pattern.inhale2_secs > 0.0 {
                Phase::Inhale2
            } else {
                hold_in_or_exhale()
            }
        }
        Phase::Inhale2 => hold_in_or_exhale(),
        Phase::HoldIn => Phase::Exhale,
        Phase::Exhale => {
            if pattern.hold_out_secs > 0.0 {
                Phase::HoldOut
            } else {
                Phase::Inhale
            }
        }
        Phase::HoldOut => Phase::Inhale,
    }
}

/// Result of checking one phase against its elapsed time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseUpdate {
    /// The next phase when `completed`, otherwise the phase that was checked
    pub phase: Phase,
    pub completed: bool,
    /// Duration of the phase that was checked
    pub duration_ms: f64,
}

/// Single completion check. A zero-duration phase is always complete.
///
/// On completion the caller is expected to reset its elapsed time to zero.
pub fn update_phase(
    phase: Phase,
    elapsed_ms: f64,
    pattern: &BreathingPattern,
    speed_multiplier: f64,
) -> PhaseUpdate {
    let duration_ms = phase_duration_ms(phase, pattern, speed_multiplier);
    let completed = duration_ms <= 0.0 || elapsed_ms >= duration_ms;

    PhaseUpdate {
        phase: if completed { next_phase(phase, pattern) } else { phase },
        completed,
        duration_ms,
    }
}

/// A phase change observed by [`PhaseCycleState::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: Phase,
    pub to: Phase,
    /// Number of single-step hops taken, zero-duration phases included
    pub hops: usize,
}

/// Mutable per-session phase state
#[derive(Debug, Clone)]
pub struct PhaseCycleState {
    pub phase: Phase,
    /// Time spent in the current phase
    pub elapsed_ms: f64,
    pub speed_multiplier: f64,
    cycles_completed: u64,
}

impl PhaseCycleState {
    pub fn new(speed_multiplier: f64) -> Self {
        Self {
            phase: Phase::Idle,
            elapsed_ms: 0.0,
            speed_multiplier,
            cycles_completed: 0,
        }
    }

    /// Number of times the cycle wrapped back to `Inhale` since start
    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn duration_ms(&self, pattern: &BreathingPattern) -> f64 {
        phase_duration_ms(self.phase, pattern, self.speed_multiplier)
    }

    pub fn remaining_ms(&self, pattern: &BreathingPattern) -> f64 {
        (self.duration_ms(pattern) - self.elapsed_ms).max(0.0)
    }

    /// Back to the `Idle`/zero baseline
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.elapsed_ms = 0.0;
        self.cycles_completed = 0;
    }

    /// Advance by `delta_ms` and settle on a phase with nonzero duration.
    ///
    /// Zero-duration phases are hopped over within the same call, so a caller
    /// polling once per tick never observes one as the current phase. Hops are
    /// bounded by one full cycle. A pattern whose whole cycle is zero at this
    /// speed stays where it is at zero progress.
    pub fn tick(&mut self, delta_ms: f64, pattern: &BreathingPattern) -> Option<PhaseTransition> {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.elapsed_ms += delta_ms;
        }

        if self.phase != Phase::Idle && pattern.cycle_secs() * self.speed_multiplier <= 0.0 {
            self.elapsed_ms = 0.0;
            return None;
        }

        let from = self.phase;
        let mut hops = 0;

        while hops <= Phase::CYCLE.len() {
            let update = update_phase(self.phase, self.elapsed_ms, pattern, self.speed_multiplier);
            if !update.completed {
                break;
            }
            self.enter(update.phase);
            hops += 1;
        }

        (hops > 0).then_some(PhaseTransition {
            from,
            to: self.phase,
            hops,
        })
    }

    fn enter(&mut self, phase: Phase) {
        if phase == Phase::Inhale && self.phase != Phase::Idle {
            self.cycles_completed += 1;
        }
        self.phase = phase;
        self.elapsed_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_pattern() -> BreathingPattern {
        BreathingPattern::new("box", 4.0, 0.0, 4.0, 4.0, 4.0)
    }

    fn relax_pattern() -> BreathingPattern {
        BreathingPattern::new("relax", 4.0, 0.0, 7.0, 8.0, 0.0)
    }

    fn coherent_pattern() -> BreathingPattern {
        BreathingPattern::new("coherent", 5.5, 0.0, 0.0, 5.5, 0.0)
    }

    /// Walks the transition function from `Inhale` until it comes back
    fn cycle_of(pattern: &BreathingPattern) -> Vec<Phase> {
        let mut order = vec![Phase::Inhale];
        let mut phase = next_phase(Phase::Inhale, pattern);
        while phase != Phase::Inhale {
            order.push(phase);
            phase = next_phase(phase, pattern);
            assert!(order.len() <= Phase::CYCLE.len(), "cycle never returned to Inhale");
        }
        order
    }

    fn cycle_ms(pattern: &BreathingPattern, speed: f64) -> f64 {
        cycle_of(pattern)
            .iter()
            .map(|&p| phase_duration_ms(p, pattern, speed))
            .sum()
    }

    #[test]
    fn test_duration_formula() {
        let pattern = relax_pattern();
        assert_eq!(phase_duration_ms(Phase::Inhale, &pattern, 1.0), 4000.0);
        assert_eq!(phase_duration_ms(Phase::HoldIn, &pattern, 1.0), 7000.0);
        assert_eq!(phase_duration_ms(Phase::Exhale, &pattern, 1.5), 12000.0);
        assert_eq!(phase_duration_ms(Phase::HoldOut, &pattern, 1.0), 0.0);
        assert_eq!(phase_duration_ms(Phase::Idle, &pattern, 2.0), 0.0);
    }

    #[test]
    fn test_phase_kinds() {
        let inhales: Vec<Phase> = Phase::CYCLE.into_iter().filter(|p| p.is_inhale()).collect();
        let holds: Vec<Phase> = Phase::CYCLE.into_iter().filter(|p| p.is_hold()).collect();
        assert_eq!(inhales, vec![Phase::Inhale, Phase::Inhale2]);
        assert_eq!(holds, vec![Phase::HoldIn, Phase::HoldOut]);
        assert!(!Phase::Idle.is_inhale() && !Phase::Idle.is_hold());
    }

    #[test]
    fn test_idle_starts_with_inhale() {
        assert_eq!(next_phase(Phase::Idle, &box_pattern()), Phase::Inhale);
    }

    #[test]
    fn test_box_cycle() {
        let pattern = box_pattern();
        assert_eq!(
            cycle_of(&pattern),
            vec![Phase::Inhale, Phase::HoldIn, Phase::Exhale, Phase::HoldOut]
        );
        assert_eq!(cycle_ms(&pattern, 1.0), 16000.0);
        for phase in cycle_of(&pattern) {
            assert_eq!(phase_duration_ms(phase, &pattern, 1.0), 4000.0);
        }
    }

    #[test]
    fn test_relax_skips_hold_out() {
        let pattern = relax_pattern();
        assert_eq!(
            cycle_of(&pattern),
            vec![Phase::Inhale, Phase::HoldIn, Phase::Exhale]
        );
        assert_eq!(cycle_ms(&pattern, 1.0), 19000.0);
    }

    #[test]
    fn test_coherent_inhale_exhale_only() {
        let pattern = coherent_pattern();
        assert_eq!(cycle_of(&pattern), vec![Phase::Inhale, Phase::Exhale]);
        assert_eq!(cycle_ms(&pattern, 1.0), 11000.0);
    }

    #[test]
    fn test_inhale2_in_order() {
        let pattern = BreathingPattern::new("double", 2.0, 1.0, 0.0, 4.0, 0.0);
        assert_eq!(
            cycle_of(&pattern),
            vec![Phase::Inhale, Phase::Inhale2, Phase::Exhale]
        );
    }

    #[test]
    fn test_update_completes_at_duration() {
        let pattern = box_pattern();

        let before = update_phase(Phase::Inhale, 3999.0, &pattern, 1.0);
        assert!(!before.completed);
        assert_eq!(before.phase, Phase::Inhale);

        let at = update_phase(Phase::Inhale, 4000.0, &pattern, 1.0);
        assert!(at.completed);
        assert_eq!(at.phase, Phase::HoldIn);
        assert_eq!(at.duration_ms, 4000.0);
    }

    #[test]
    fn test_zero_duration_phase_always_complete() {
        let pattern = relax_pattern();
        let update = update_phase(Phase::HoldOut, 0.0, &pattern, 1.0);
        assert!(update.completed);
        assert_eq!(update.phase, Phase::Inhale);
    }

    #[test]
    fn test_state_tick_walks_box_cycle() {
        let pattern = box_pattern();
        let mut state = PhaseCycleState::new(1.0);

        let start = state.tick(0.0, &pattern).unwrap();
        assert_eq!((start.from, start.to), (Phase::Idle, Phase::Inhale));

        let mut visited = vec![state.phase];
        for _ in 0..4 {
            assert!(state.tick(3000.0, &pattern).is_none());
            assert_eq!(state.elapsed_ms, 3000.0);
            let t = state.tick(1000.0, &pattern).unwrap();
            assert_eq!(t.hops, 1);
            assert_eq!(state.elapsed_ms, 0.0);
            visited.push(state.phase);
        }

        assert_eq!(
            visited,
            vec![
                Phase::Inhale,
                Phase::HoldIn,
                Phase::Exhale,
                Phase::HoldOut,
                Phase::Inhale
            ]
        );
        assert_eq!(state.cycles_completed(), 1);
    }

    #[test]
    fn test_tick_skips_consecutive_zero_phases() {
        // Inhale has zero length: Idle -> Inhale -> Exhale in one tick
        let pattern = BreathingPattern::new("exhale-only", 0.0, 0.0, 0.0, 6.0, 0.0);
        let mut state = PhaseCycleState::new(1.0);

        let t = state.tick(16.0, &pattern).unwrap();
        assert_eq!(t.to, Phase::Exhale);
        assert_eq!(t.hops, 2);
        assert_eq!(state.elapsed_ms, 0.0);
    }

    #[test]
    fn test_all_zero_pattern_stalls_at_zero() {
        let pattern = BreathingPattern::new("nothing", 0.0, 0.0, 0.0, 0.0, 0.0);
        let mut state = PhaseCycleState::new(1.0);
        state.tick(0.0, &pattern);

        for _ in 0..10 {
            assert!(state.tick(500.0, &pattern).is_none());
            assert_eq!(state.elapsed_ms, 0.0);
            assert_eq!(state.remaining_ms(&pattern), 0.0);
        }
    }

    #[test]
    fn test_negative_delta_ignored() {
        let pattern = box_pattern();
        let mut state = PhaseCycleState::new(1.0);
        state.tick(0.0, &pattern);
        state.tick(1000.0, &pattern);
        state.tick(-500.0, &pattern);
        state.tick(f64::NAN, &pattern);
        assert_eq!(state.elapsed_ms, 1000.0);
        assert_eq!(state.remaining_ms(&pattern), 3000.0);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let pattern = box_pattern();
        let mut state = PhaseCycleState::new(1.0);
        state.tick(0.0, &pattern);
        state.tick(5000.0, &pattern);
        state.reset();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.elapsed_ms, 0.0);
        assert_eq!(state.cycles_completed(), 0);
    }
}
