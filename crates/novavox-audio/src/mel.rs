//! Mel spectrogram intermediate
//!
//! The TTS model emits a mel-like spectral representation; the vocoder turns
//! it into a waveform. Frames are time-ordered, each holding one energy
//! value per mel band.

use novavox_foundation::AudioError;

/// Frames × bands energy matrix with its framing parameters.
#[derive(Debug, Clone)]
pub struct MelSpectrogram {
    frames: Vec<Vec<f32>>,
    hop_length: usize,
    sample_rate: u32,
}

impl MelSpectrogram {
    /// Build a spectrogram, rejecting ragged frames and a zero hop.
    pub fn new(
        frames: Vec<Vec<f32>>,
        hop_length: usize,
        sample_rate: u32,
    ) -> Result<Self, AudioError> {
        if hop_length == 0 {
            return Err(AudioError::MalformedSpectrogram(
                "hop length must be non-zero".to_string(),
            ));
        }
        if let Some(first) = frames.first() {
            let n_mels = first.len();
            if n_mels == 0 {
                return Err(AudioError::MalformedSpectrogram(
                    "frames must have at least one band".to_string(),
                ));
            }
            if let Some(bad) = frames.iter().position(|f| f.len() != n_mels) {
                return Err(AudioError::MalformedSpectrogram(format!(
                    "frame {bad} has {} bands, expected {n_mels}",
                    frames[bad].len()
                )));
            }
        }
        Ok(Self {
            frames,
            hop_length,
            sample_rate,
        })
    }

    pub fn frames(&self) -> &[Vec<f32>] {
        &self.frames
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn n_mels(&self) -> usize {
        self.frames.first().map_or(0, Vec::len)
    }

    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
