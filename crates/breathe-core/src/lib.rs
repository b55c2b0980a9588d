//! Core of the breathe session visualizer
//!
//! Everything with timing or state semantics lives here: the phase engine,
//! the phase-to-scale mapper, the reactive particle field and the audio cue
//! dispatcher. Nothing in this crate touches a window or an audio device, so
//! the whole session can be driven headless.

pub mod cue;
pub mod error;
pub mod particles;
pub mod pattern;
pub mod phase;
pub mod registry;
pub mod session;
pub mod visual;

#[cfg(test)]
mod tests_proptest;

pub use cue::{cue_for_phase, CueBackend, CueDispatcher, CueHandle, CueType};
pub use error::{CueError, PatternError};
pub use particles::{FrameParams, Particle, ParticleField, DEFAULT_POPULATION};
pub use pattern::{BreathingPattern, Rgb};
pub use phase::{
    next_phase, phase_duration_ms, update_phase, Phase, PhaseCycleState, PhaseTransition,
    PhaseUpdate,
};
pub use registry::{PatternRegistry, DEFAULT_MODE};
pub use session::{BreathingSession, SpeedRange, TickOutcome, TimerToken};
pub use visual::{visual_state, PhaseVisualState};
