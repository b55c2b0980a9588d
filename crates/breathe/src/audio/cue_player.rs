//! cpal-backed cue playback.
//!
//! One output stream per session mixes every cue voice additively, so a cue
//! never interrupts other audio on the system. Handles only flip voice flags
//! under the mixer lock; the audio callback does the rest.

use breathe_core::{CueBackend, CueError, CueHandle, CueType};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample, Stream, StreamConfig};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

use super::clip::Clip;

struct Voice {
    clip: Clip,
    /// Position in clip frames
    cursor: f64,
    playing: bool,
}

struct Mixer {
    voices: HashMap<CueType, Voice>,
    volume: f32,
    output_rate: f64,
}

impl Mixer {
    fn new(volume: f32) -> Self {
        Self {
            voices: HashMap::new(),
            volume,
            output_rate: 48000.0,
        }
    }

    fn insert(&mut self, cue: CueType, clip: Clip) {
        self.voices.insert(
            cue,
            Voice {
                clip,
                cursor: 0.0,
                playing: false,
            },
        );
    }

    fn voice_mut(&mut self, cue: CueType) -> Option<&mut Voice> {
        self.voices.get_mut(&cue)
    }

    #[cfg(test)]
    fn is_playing(&self, cue: CueType) -> bool {
        self.voices.get(&cue).is_some_and(|v| v.playing)
    }

    /// Fill an interleaved output buffer with every playing voice
    fn render(&mut self, out: &mut [f32], channels: usize) {
        out.iter_mut().for_each(|s| *s = 0.0);
        let channels = channels.max(1);

        for voice in self.voices.values_mut().filter(|v| v.playing) {
            let step = voice.clip.sample_rate as f64 / self.output_rate;
            let samples = &voice.clip.samples;

            for frame in out.chunks_mut(channels) {
                let idx = voice.cursor as usize;
                let Some(&sample) = samples.get(idx) else {
                    voice.playing = false;
                    break;
                };
                for s in frame.iter_mut() {
                    *s += sample * self.volume;
                }
                voice.cursor += step;
            }
        }

        out.iter_mut().for_each(|s| *s = s.clamp(-1.0, 1.0));
    }
}

/// Backend that loads `<cue_dir>/<cue>.wav` and plays through the default
/// output device.
pub struct CpalCueBackend {
    cue_dir: PathBuf,
    mixer: Arc<Mutex<Mixer>>,
    _stream: Option<Stream>,
}

impl CpalCueBackend {
    pub fn new(cue_dir: PathBuf, volume: f32) -> Self {
        Self {
            cue_dir,
            mixer: Arc::new(Mutex::new(Mixer::new(volume))),
            _stream: None,
        }
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &StreamConfig,
        mixer: Arc<Mutex<Mixer>>,
    ) -> Result<Stream, CueError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let channels = config.channels as usize;
        let mut scratch: Vec<f32> = Vec::new();

        let err_fn = |err| error!("Cue stream error: {}", err);

        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    scratch.resize(data.len(), 0.0);
                    match mixer.lock() {
                        Ok(mut mixer) => mixer.render(&mut scratch, channels),
                        Err(_) => scratch.iter_mut().for_each(|s| *s = 0.0),
                    }
                    for (dst, src) in data.iter_mut().zip(scratch.iter()) {
                        *dst = T::from_sample(*src);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| CueError::Stream(e.to_string()))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Mixer>, CueError> {
        self.mixer
            .lock()
            .map_err(|_| CueError::Stream("mixer lock poisoned".into()))
    }
}

impl CueBackend for CpalCueBackend {
    type Handle = CpalCueHandle;

    fn init_audio_mode(&mut self) -> Result<(), CueError> {
        if self._stream.is_some() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(CueError::NoDevice)?;
        let supported = device
            .default_output_config()
            .map_err(|e| CueError::Stream(e.to_string()))?;
        let config: StreamConfig = supported.config();

        self.lock()?.output_rate = config.sample_rate.0 as f64;

        let mixer = Arc::clone(&self.mixer);
        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => Self::build_stream::<f32>(&device, &config, mixer)?,
            cpal::SampleFormat::I16 => Self::build_stream::<i16>(&device, &config, mixer)?,
            cpal::SampleFormat::U16 => Self::build_stream::<u16>(&device, &config, mixer)?,
            other => {
                return Err(CueError::Stream(format!(
                    "unsupported sample format {:?}",
                    other
                )))
            }
        };
        stream.play().map_err(|e| CueError::Stream(e.to_string()))?;

        info!(
            "Cue output: {} ({} Hz, {} ch)",
            device.name().unwrap_or_else(|_| "unknown".into()),
            config.sample_rate.0,
            config.channels
        );
        self._stream = Some(stream);
        Ok(())
    }

    fn create_handle(&mut self, cue: CueType) -> Result<CpalCueHandle, CueError> {
        let path = self.cue_dir.join(format!("{}.wav", cue.file_stem()));
        let clip = Clip::load(&path)?;
        let frames = clip.frames();
        self.lock()?.insert(cue, clip);

        Ok(CpalCueHandle {
            cue,
            frames,
            mixer: Arc::clone(&self.mixer),
        })
    }
}

pub struct CpalCueHandle {
    cue: CueType,
    frames: usize,
    mixer: Arc<Mutex<Mixer>>,
}

impl CpalCueHandle {
    fn with_voice(&self, f: impl FnOnce(&mut Voice)) -> Result<(), CueError> {
        let mut mixer = self
            .mixer
            .lock()
            .map_err(|_| CueError::Stream("mixer lock poisoned".into()))?;
        let voice = mixer.voice_mut(self.cue).ok_or(CueError::NotInitialized)?;
        f(voice);
        Ok(())
    }
}

impl CueHandle for CpalCueHandle {
    fn rewind(&mut self) -> Result<(), CueError> {
        if self.frames == 0 {
            return Err(CueError::TooShort { frames: 0 });
        }
        self.with_voice(|voice| voice.cursor = 0.0)
    }

    /// A voice that already ran to the end starts over, rewound or not.
    fn play(&mut self) -> Result<(), CueError> {
        let frames = self.frames as f64;
        self.with_voice(|voice| {
            if voice.cursor >= frames {
                voice.cursor = 0.0;
            }
            voice.playing = true;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(frames: usize, rate: u32) -> Clip {
        Clip::from_interleaved(&vec![0.5; frames], 1, rate)
    }

    fn handle(mixer: &Arc<Mutex<Mixer>>, cue: CueType, frames: usize) -> CpalCueHandle {
        CpalCueHandle {
            cue,
            frames,
            mixer: Arc::clone(mixer),
        }
    }

    #[test]
    fn test_render_mixes_and_finishes() {
        let mut mixer = Mixer::new(1.0);
        mixer.insert(CueType::Inhale, tone(4, 48000));
        mixer.voice_mut(CueType::Inhale).unwrap().playing = true;

        let mut out = vec![0.0; 12];
        mixer.render(&mut out, 2);

        assert_eq!(&out[..8], &[0.5; 8]);
        assert_eq!(&out[8..], &[0.0; 4]);
        assert!(!mixer.is_playing(CueType::Inhale));
    }

    #[test]
    fn test_render_clamps_overlap() {
        let mut mixer = Mixer::new(1.0);
        mixer.insert(CueType::Inhale, Clip::from_interleaved(&[0.8; 8], 1, 48000));
        mixer.insert(CueType::Hold, Clip::from_interleaved(&[0.8; 8], 1, 48000));
        mixer.voice_mut(CueType::Inhale).unwrap().playing = true;
        mixer.voice_mut(CueType::Hold).unwrap().playing = true;

        let mut out = vec![0.0; 4];
        mixer.render(&mut out, 1);
        assert!(out.iter().all(|s| *s == 1.0));
    }

    #[test]
    fn test_rewind_restarts_voice() {
        let mixer = Arc::new(Mutex::new(Mixer::new(1.0)));
        mixer.lock().unwrap().insert(CueType::Exhale, tone(256, 48000));
        let mut h = handle(&mixer, CueType::Exhale, 256);

        h.play().unwrap();
        let mut out = vec![0.0; 100];
        mixer.lock().unwrap().render(&mut out, 1);

        h.rewind().unwrap();
        h.play().unwrap();
        let m = mixer.lock().unwrap();
        let voice = m.voices.get(&CueType::Exhale).unwrap();
        assert_eq!(voice.cursor, 0.0);
        assert!(voice.playing);
    }

    #[test]
    fn test_short_clip_replays() {
        let mixer = Arc::new(Mutex::new(Mixer::new(1.0)));
        mixer.lock().unwrap().insert(CueType::Hold, tone(8, 48000));
        let mut h = handle(&mixer, CueType::Hold, 8);

        for _ in 0..3 {
            h.rewind().unwrap();
            h.play().unwrap();
            let mut out = vec![0.0; 16];
            mixer.lock().unwrap().render(&mut out, 1);
            assert_eq!(&out[..8], &[0.5; 8]);
            assert!(!mixer.lock().unwrap().is_playing(CueType::Hold));
        }
    }

    #[test]
    fn test_finished_voice_restarts_without_rewind() {
        let mixer = Arc::new(Mutex::new(Mixer::new(1.0)));
        mixer.lock().unwrap().insert(CueType::Inhale, tone(4, 48000));
        let mut h = handle(&mixer, CueType::Inhale, 4);

        h.play().unwrap();
        let mut out = vec![0.0; 8];
        mixer.lock().unwrap().render(&mut out, 1);

        h.play().unwrap();
        mixer.lock().unwrap().render(&mut out, 1);
        assert_eq!(&out[..4], &[0.5; 4]);
    }

    #[test]
    fn test_empty_clip_cannot_rewind() {
        let mixer = Arc::new(Mutex::new(Mixer::new(1.0)));
        mixer.lock().unwrap().insert(CueType::Exhale, tone(0, 48000));
        let mut h = handle(&mixer, CueType::Exhale, 0);
        assert!(matches!(h.rewind(), Err(CueError::TooShort { frames: 0 })));
    }
}
