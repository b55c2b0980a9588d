//! Property tests for the phase engine, visual mapper and particle field.

use proptest::prelude::*;

use crate::particles::ParticleField;
use crate::pattern::BreathingPattern;
use crate::phase::{next_phase, phase_duration_ms, Phase};
use crate::visual::visual_state;

/// Durations where zero (a skipped phase) is common
fn duration() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), 0.25f64..12.0]
}

fn pattern() -> impl Strategy<Value = BreathingPattern> {
    (0.25f64..12.0, duration(), duration(), 0.25f64..12.0, duration())
        .prop_map(|(i, i2, hi, e, ho)| BreathingPattern::new("prop", i, i2, hi, e, ho))
}

fn any_phase() -> impl Strategy<Value = Phase> {
    prop_oneof![
        Just(Phase::Inhale),
        Just(Phase::Inhale2),
        Just(Phase::HoldIn),
        Just(Phase::Exhale),
        Just(Phase::HoldOut),
        Just(Phase::Idle),
    ]
}

proptest! {
    #[test]
    fn duration_is_seconds_times_speed(p in pattern(), phase in any_phase(), speed in 0.5f64..2.0) {
        let expected = if phase == Phase::Idle { 0.0 } else { p.seconds(phase) * speed * 1000.0 };
        prop_assert_eq!(phase_duration_ms(phase, &p, speed), expected);

        if phase != Phase::Idle {
            prop_assert_eq!(phase_duration_ms(phase, &p, 1.0), p.seconds(phase) * 1000.0);
        }
    }

    #[test]
    fn cycle_visits_nonzero_phases_in_order(p in pattern()) {
        let expected: Vec<Phase> = Phase::CYCLE
            .iter()
            .copied()
            .filter(|&ph| matches!(ph, Phase::Inhale | Phase::Exhale) || p.seconds(ph) > 0.0)
            .collect();

        let mut visited = vec![Phase::Inhale];
        let mut phase = next_phase(Phase::Inhale, &p);
        while phase != Phase::Inhale {
            visited.push(phase);
            phase = next_phase(phase, &p);
            prop_assert!(visited.len() <= Phase::CYCLE.len());
        }

        prop_assert_eq!(visited, expected);
    }

    #[test]
    fn progress_stays_in_unit_range(
        p in pattern(),
        phase in any_phase(),
        elapsed in 0.0f64..30_000.0,
        speed in 0.5f64..2.0,
    ) {
        let state = visual_state(phase, elapsed, &p, speed);
        prop_assert!((0.0..=1.0).contains(&state.progress));
        prop_assert!((0.0..=1.0).contains(&state.scale));

        let duration = phase_duration_ms(phase, &p, speed);
        if duration > 0.0 && elapsed < duration {
            prop_assert!(state.progress < 1.0);
        }
        prop_assert_eq!(visual_state(phase, 0.0, &p, speed).progress, 0.0);
    }

    #[test]
    fn mapper_is_idempotent(
        p in pattern(),
        phase in any_phase(),
        elapsed in 0.0f64..30_000.0,
        speed in 0.5f64..2.0,
    ) {
        prop_assert_eq!(
            visual_state(phase, elapsed, &p, speed),
            visual_state(phase, elapsed, &p, speed)
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn pool_size_only_changes_on_resize(
        seed in any::<u64>(),
        population in 1usize..200,
        frames in 1usize..400,
        speed in 0.5f32..2.0,
    ) {
        let mut field = ParticleField::with_seed(population, 640.0, 480.0, seed);
        for frame in 0..frames {
            field.update(Phase::CYCLE[frame / 50 % Phase::CYCLE.len()], speed);
            prop_assert_eq!(field.len(), population);
        }

        field.resize(1024.0, 768.0);
        prop_assert_eq!(field.len(), population);
        for p in field.particles() {
            prop_assert!(p.x >= 0.0 && p.x < 1024.0 && p.y >= 0.0 && p.y < 768.0);
        }
    }
}
