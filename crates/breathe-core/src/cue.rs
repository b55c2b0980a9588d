//! Audio cue dispatch.
//!
//! Cues are short pre-recorded clips played when a phase begins. The
//! dispatcher only decides *when* and *which*; producing sound is delegated to
//! a [`CueBackend`]. Every failure is absorbed here so audio can never stall
//! the phase or visual logic.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::CueError;
use crate::phase::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueType {
    Inhale,
    Exhale,
    Hold,
}

impl CueType {
    pub const ALL: [CueType; 3] = [CueType::Inhale, CueType::Exhale, CueType::Hold];

    /// Base file name of the clip for this cue
    pub fn file_stem(self) -> &'static str {
        match self {
            CueType::Inhale => "inhale",
            CueType::Exhale => "exhale",
            CueType::Hold => "hold",
        }
    }
}

/// Cue announcing the start of `phase`, if any
pub fn cue_for_phase(phase: Phase) -> Option<CueType> {
    match phase {
        Phase::Inhale | Phase::Inhale2 => Some(CueType::Inhale),
        Phase::HoldIn | Phase::HoldOut => Some(CueType::Hold),
        Phase::Exhale => Some(CueType::Exhale),
        Phase::Idle => None,
    }
}

/// A loaded, replayable clip
pub trait CueHandle {
    /// Seek back to the first frame
    fn rewind(&mut self) -> Result<(), CueError>;

    /// Start (or restart) playback from the current position
    fn play(&mut self) -> Result<(), CueError>;
}

/// Whatever produces the sound
pub trait CueBackend {
    type Handle: CueHandle;

    /// One-time audio setup (output stream, mixing behavior).
    /// Called at most once per dispatcher, before the first handle is created.
    fn init_audio_mode(&mut self) -> Result<(), CueError>;

    fn create_handle(&mut self, cue: CueType) -> Result<Self::Handle, CueError>;
}

/// Lazily built, session-owned cache of cue handles
pub struct CueDispatcher<B: CueBackend> {
    backend: B,
    handles: HashMap<CueType, B::Handle>,
    /// Cues whose handle could not be created; not retried this session
    failed: HashSet<CueType>,
    audio_mode: Option<bool>,
    muted: bool,
}

impl<B: CueBackend> CueDispatcher<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            handles: HashMap::new(),
            failed: HashSet::new(),
            audio_mode: None,
            muted: false,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Number of cached handles
    pub fn cached(&self) -> usize {
        self.handles.len()
    }

    /// Fire-and-forget playback of `cue`.
    pub fn play(&mut self, cue: CueType) {
        if self.muted || self.failed.contains(&cue) {
            return;
        }

        if !self.ensure_audio_mode() {
            return;
        }

        if !self.handles.contains_key(&cue) {
            match self.backend.create_handle(cue) {
                Ok(handle) => {
                    self.handles.insert(cue, handle);
                }
                Err(e) => {
                    warn!("Cue {:?} unavailable: {}", cue, e);
                    self.failed.insert(cue);
                    return;
                }
            }
        }

        if let Some(handle) = self.handles.get_mut(&cue) {
            if let Err(e) = handle.rewind() {
                debug!("Cue {:?} rewind skipped: {}", cue, e);
            }
            match handle.play() {
                Ok(()) => debug!("Cue {:?} playing", cue),
                Err(e) => warn!("Cue {:?} failed to play: {}", cue, e),
            }
        }
    }

    /// Play the cue for a phase that just began
    pub fn announce(&mut self, phase: Phase) {
        if let Some(cue) = cue_for_phase(phase) {
            self.play(cue);
        }
    }

    fn ensure_audio_mode(&mut self) -> bool {
        if let Some(ready) = self.audio_mode {
            return ready;
        }

        let ready = match self.backend.init_audio_mode() {
            Ok(()) => true,
            Err(e) => {
                warn!("Audio cues disabled: {}", e);
                false
            }
        };
        self.audio_mode = Some(ready);
        ready
    }
}
