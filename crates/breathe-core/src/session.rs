//! Session controller.
//!
//! Ties the phase engine, the visual mapper and the cue dispatcher together
//! for one start-to-stop run. The host drives it either from a frame loop
//! ([`tick`](BreathingSession::tick) with wall-clock deltas) or from a timer
//! ([`on_timer`](BreathingSession::on_timer) at each phase boundary); both go
//! through the same phase code.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cue::{CueBackend, CueDispatcher};
use crate::pattern::BreathingPattern;
use crate::phase::{Phase, PhaseCycleState, PhaseTransition};
use crate::visual::{visual_state, PhaseVisualState};

/// Allowed speed multipliers and the UI step between them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for SpeedRange {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 2.0,
            step: 0.1,
        }
    }
}

impl SpeedRange {
    pub fn clamp(&self, speed: f64) -> f64 {
        if !speed.is_finite() {
            return 1.0_f64.clamp(self.min, self.max);
        }
        speed.clamp(self.min, self.max)
    }

    pub fn step_up(&self, speed: f64) -> f64 {
        self.clamp(Self::round(speed + self.step))
    }

    pub fn step_down(&self, speed: f64) -> f64 {
        self.clamp(Self::round(speed - self.step))
    }

    /// Keeps repeated steps from accumulating float noise
    fn round(speed: f64) -> f64 {
        (speed * 100.0).round() / 100.0
    }
}

/// What one tick produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub visual: PhaseVisualState,
    pub transition: Option<PhaseTransition>,
}

/// Identifies the run a timer callback was scheduled for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken(u64);

pub struct BreathingSession<B: CueBackend> {
    pattern: Arc<BreathingPattern>,
    speed_multiplier: f64,
    state: PhaseCycleState,
    /// Present exactly while the session runs
    cues: Option<CueDispatcher<B>>,
    muted: bool,
    /// Bumped on start and stop so stale timer callbacks are ignored
    generation: u64,
}

impl<B: CueBackend> BreathingSession<B> {
    pub fn new(pattern: Arc<BreathingPattern>, speed_multiplier: f64) -> Self {
        Self {
            pattern,
            speed_multiplier,
            state: PhaseCycleState::new(speed_multiplier),
            cues: None,
            muted: false,
            generation: 0,
        }
    }

    /// Begin at `Inhale`. Cue handles are created lazily through `backend`.
    pub fn start(&mut self, backend: B) {
        if self.is_running() {
            self.stop();
        }

        let mut cues = CueDispatcher::new(backend);
        cues.set_muted(self.muted);
        self.cues = Some(cues);
        self.generation = self.generation.wrapping_add(1);

        self.state = PhaseCycleState::new(self.speed_multiplier);
        let transition = self.state.tick(0.0, &self.pattern);

        info!(
            "Session started: {} at x{:.2} ({:.1}s cycle)",
            self.pattern.name,
            self.speed_multiplier,
            self.pattern.cycle_secs() * self.speed_multiplier
        );
        self.announce(transition);
    }

    /// Cancel pending timer callbacks, drop the cue cache and return to `Idle`.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.generation = self.generation.wrapping_add(1);
        self.cues = None;
        let cycles = self.state.cycles_completed();
        self.state.reset();
        info!("Session stopped after {} cycles", cycles);
    }

    pub fn is_running(&self) -> bool {
        self.cues.is_some()
    }

    /// Frame-loop driver: advance by `delta_ms` of wall-clock time.
    pub fn tick(&mut self, delta_ms: f64) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome {
                visual: PhaseVisualState::IDLE,
                transition: None,
            };
        }

        let transition = self.state.tick(delta_ms, &self.pattern);
        self.announce(transition);

        TickOutcome {
            visual: self.visual_state(),
            transition,
        }
    }

    /// Timer driver: jump straight to the end of the current phase.
    ///
    /// Elapsed time is set to the full duration rather than topped up by the
    /// remainder, which can round to just short of the boundary.
    pub fn advance_to_boundary(&mut self) -> TickOutcome {
        if self.is_running() {
            let duration = self.state.duration_ms(&self.pattern);
            self.state.elapsed_ms = self.state.elapsed_ms.max(duration);
        }
        self.tick(0.0)
    }

    /// Token to attach to a timer scheduled for the current run
    pub fn timer_token(&self) -> TimerToken {
        TimerToken(self.generation)
    }

    /// Timer callback. Returns `None` for callbacks that outlived their run.
    pub fn on_timer(&mut self, token: TimerToken) -> Option<TickOutcome> {
        if token != self.timer_token() || !self.is_running() {
            return None;
        }
        Some(self.advance_to_boundary())
    }

    /// Milliseconds until the next phase boundary, `None` while stopped
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.is_running().then(|| self.remaining_ms())
    }

    /// Switch technique. A running session restarts its cycle at `Inhale`.
    pub fn set_pattern(&mut self, pattern: Arc<BreathingPattern>) {
        self.pattern = pattern;
        if self.is_running() {
            self.generation = self.generation.wrapping_add(1);
            self.state = PhaseCycleState::new(self.speed_multiplier);
            let transition = self.state.tick(0.0, &self.pattern);
            info!("Pattern switched to {}", self.pattern.name);
            self.announce(transition);
        }
    }

    /// Takes effect immediately; elapsed time in the current phase is kept.
    pub fn set_speed(&mut self, speed_multiplier: f64) {
        self.speed_multiplier = speed_multiplier;
        self.state.speed_multiplier = speed_multiplier;
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(cues) = self.cues.as_mut() {
            cues.set_muted(muted);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn pattern(&self) -> &Arc<BreathingPattern> {
        &self.pattern
    }

    pub fn speed(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.state.elapsed_ms
    }

    pub fn remaining_ms(&self) -> f64 {
        self.state.remaining_ms(&self.pattern)
    }

    pub fn cycles_completed(&self) -> u64 {
        self.state.cycles_completed()
    }

    pub fn visual_state(&self) -> PhaseVisualState {
        visual_state(
            self.state.phase,
            self.state.elapsed_ms,
            &self.pattern,
            self.speed_multiplier,
        )
    }

    pub fn cues(&self) -> Option<&CueDispatcher<B>> {
        self.cues.as_ref()
    }

    fn announce(&mut self, transition: Option<PhaseTransition>) {
        let Some(transition) = transition else {
            return;
        };

        debug!(
            "{:?} -> {:?} ({} hops, {:.0}ms)",
            transition.from,
            transition.to,
            transition.hops,
            self.state.duration_ms(&self.pattern)
        );

        if let Some(cues) = self.cues.as_mut() {
            cues.announce(transition.to);
        }
    }
}
