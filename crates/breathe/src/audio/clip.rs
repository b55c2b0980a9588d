//! Cue clip loading.

use breathe_core::CueError;
use std::path::Path;
use std::sync::Arc;

/// A decoded cue, mixed down to mono
#[derive(Clone)]
pub struct Clip {
    pub samples: Arc<Vec<f32>>,
    pub sample_rate: u32,
}

impl Clip {
    pub fn load(path: &Path) -> Result<Self, CueError> {
        let load_err = |reason: String| CueError::Load {
            path: path.display().to_string(),
            reason,
        };

        let mut reader = hound::WavReader::open(path).map_err(|e| load_err(e.to_string()))?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let raw: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| load_err(e.to_string()))?,
            hound::SampleFormat::Int => {
                let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_val))
                    .collect::<Result<_, _>>()
                    .map_err(|e| load_err(e.to_string()))?
            }
        };

        Ok(Self::from_interleaved(&raw, channels, spec.sample_rate))
    }

    pub fn from_interleaved(raw: &[f32], channels: usize, sample_rate: u32) -> Self {
        let channels = channels.max(1);
        let samples = raw
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();

        Self {
            samples: Arc::new(samples),
            sample_rate,
        }
    }

    pub fn frames(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_mixdown() {
        let clip = Clip::from_interleaved(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2, 44100);
        assert_eq!(clip.frames(), 3);
        assert_eq!(*clip.samples, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = Clip::load(Path::new("does/not/exist.wav")).err().unwrap();
        assert!(matches!(err, CueError::Load { .. }));
    }
}
