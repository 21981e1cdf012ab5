//! Mock STT backend for pipeline tests

use novavox_audio::AudioBuffer;
use novavox_foundation::{LoadError, RunError, UnloadError};
use novavox_session::{ModelArtifact, ModelBackend, SessionConfig};

use crate::TokenIds;

/// Scripted STT backend: returns a fixed token sequence for any non-empty
/// input, or a scripted failure.
#[derive(Debug, Default)]
pub struct MockSttBackend {
    tokens: TokenIds,
    fail_run: bool,
}

impl MockSttBackend {
    pub fn with_tokens(tokens: TokenIds) -> Self {
        Self {
            tokens,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_run: true,
            ..Self::default()
        }
    }
}

impl ModelBackend for MockSttBackend {
    type Input = AudioBuffer;
    type Output = TokenIds;

    fn id(&self) -> &'static str {
        "mock-stt"
    }

    fn load(&mut self, _artifact: &ModelArtifact, _config: &SessionConfig) -> Result<(), LoadError> {
        Ok(())
    }

    fn run(&mut self, audio: AudioBuffer) -> Result<TokenIds, RunError> {
        if self.fail_run {
            return Err(RunError::Failed("scripted transcription failure".to_string()));
        }
        if audio.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.tokens.clone())
    }

    fn unload(&mut self) -> Result<(), UnloadError> {
        Ok(())
    }
}
