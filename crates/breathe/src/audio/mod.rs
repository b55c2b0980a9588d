mod clip;
mod cue_player;

pub use cue_player::CpalCueBackend;
