//! Mock TTS backend for pipeline tests

use std::sync::{Arc, Mutex};

use novavox_audio::{MelSpectrogram, HOP_LENGTH, SAMPLE_RATE_HZ};
use novavox_foundation::{LoadError, RunError, UnloadError};
use novavox_session::{ModelArtifact, ModelBackend, SessionConfig};

use crate::TtsInput;

/// Deterministic TTS backend: emits one mel frame per input token, with band
/// energies derived from the token id. Records the exact input it received.
#[derive(Debug)]
pub struct MockTtsBackend {
    n_mels: usize,
    fail_run: bool,
    captured: Arc<Mutex<Option<TtsInput>>>,
}

impl MockTtsBackend {
    pub fn new() -> Self {
        Self {
            n_mels: 8,
            fail_run: false,
            captured: Arc::new(Mutex::new(None)),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_run: true,
            ..Self::new()
        }
    }

    /// Handle to the last input seen by `run`.
    pub fn captured(&self) -> Arc<Mutex<Option<TtsInput>>> {
        self.captured.clone()
    }
}

impl Default for MockTtsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBackend for MockTtsBackend {
    type Input = TtsInput;
    type Output = MelSpectrogram;

    fn id(&self) -> &'static str {
        "mock-tts"
    }

    fn load(&mut self, _artifact: &ModelArtifact, _config: &SessionConfig) -> Result<(), LoadError> {
        Ok(())
    }

    fn run(&mut self, input: TtsInput) -> Result<MelSpectrogram, RunError> {
        if self.fail_run {
            return Err(RunError::Failed("scripted synthesis failure".to_string()));
        }
        let frames: Vec<Vec<f32>> = input
            .token_ids
            .iter()
            .map(|&id| {
                (0..self.n_mels)
                    .map(|k| 0.1 + ((id as usize + k) % 7) as f32 / 7.0)
                    .collect()
            })
            .collect();
        *self.captured.lock().unwrap() = Some(input);
        MelSpectrogram::new(frames, HOP_LENGTH, SAMPLE_RATE_HZ)
            .map_err(|e| RunError::Failed(e.to_string()))
    }

    fn unload(&mut self) -> Result<(), UnloadError> {
        Ok(())
    }
}
