//! PCM → STT session → vocabulary decode

use std::sync::Arc;

use novavox_audio::codec;
use novavox_foundation::NovaVoxError;
use novavox_vocab::Vocabulary;

use crate::SttSession;

/// Turns little-endian PCM16 bytes into transcribed text.
///
/// No internal retry: failures surface to the caller, which decides whether
/// to re-submit.
pub struct TranscriptionPipeline {
    session: Arc<SttSession>,
    vocab: Arc<Vocabulary>,
}

impl TranscriptionPipeline {
    pub fn new(session: Arc<SttSession>, vocab: Arc<Vocabulary>) -> Self {
        Self { session, vocab }
    }

    pub fn session(&self) -> &Arc<SttSession> {
        &self.session
    }

    /// Transcribe raw PCM16 bytes (mono, 16 kHz) to text.
    pub fn transcribe(&self, pcm_bytes: &[u8]) -> Result<String, NovaVoxError> {
        let audio = codec::pcm16_to_float(pcm_bytes)?;
        tracing::debug!(
            samples = audio.len(),
            duration_secs = audio.duration_secs(),
            "transcribing audio"
        );
        let token_ids = self.session.run(audio)?;
        let text = self.vocab.decode(&token_ids)?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use novavox_foundation::{ModelKind, RunError, SessionState};
    use novavox_session::{InferenceSession, SessionConfig};
    use novavox_vocab::TokenLevel;

    use crate::mock::MockSttBackend;

    fn word_vocab() -> Arc<Vocabulary> {
        let mut units = HashMap::new();
        for (i, u) in ["<pad>", "<eos>", "<unk>", "hello", "world"]
            .iter()
            .enumerate()
        {
            units.insert(u.to_string(), i as u32);
        }
        Vocabulary::from_parts(units, 0, 1, 2, TokenLevel::Word)
            .unwrap()
            .shared()
    }

    fn loaded_session(backend: MockSttBackend) -> (Arc<SttSession>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stt.onnx");
        std::fs::write(&path, [0x08, 0x07, 0x12, 0x00, 1, 2, 3, 4]).unwrap();
        let session = Arc::new(InferenceSession::new(
            ModelKind::Stt,
            SessionConfig::default(),
            Box::new(backend),
        ));
        session.load(&path).unwrap();
        (session, dir)
    }

    fn pcm_of(samples: usize) -> Vec<u8> {
        vec![0u8; samples * 2]
    }

    #[test]
    fn transcribes_scripted_tokens_through_vocab() {
        // "hello world" followed by eos then trailing garbage the decoder
        // must never reach.
        let (session, _dir) = loaded_session(MockSttBackend::with_tokens(vec![3, 4, 1, 3]));
        let pipeline = TranscriptionPipeline::new(session, word_vocab());

        assert_eq!(pipeline.transcribe(&pcm_of(160)).unwrap(), "hello world");
    }

    #[test]
    fn pad_tokens_are_skipped_in_output() {
        let (session, _dir) = loaded_session(MockSttBackend::with_tokens(vec![0, 3, 0, 4]));
        let pipeline = TranscriptionPipeline::new(session, word_vocab());

        assert_eq!(pipeline.transcribe(&pcm_of(160)).unwrap(), "hello world");
    }

    #[test]
    fn odd_length_buffer_is_malformed_input() {
        let (session, _dir) = loaded_session(MockSttBackend::with_tokens(vec![3]));
        let pipeline = TranscriptionPipeline::new(session, word_vocab());

        let err = pipeline.transcribe(&[0u8; 3]).unwrap_err();
        assert!(matches!(err, NovaVoxError::Audio(_)));
    }

    #[test]
    fn unloaded_session_reports_not_ready() {
        let session = Arc::new(InferenceSession::new(
            ModelKind::Stt,
            SessionConfig::default(),
            Box::new(MockSttBackend::with_tokens(vec![3])),
        ));
        let pipeline = TranscriptionPipeline::new(session, word_vocab());

        match pipeline.transcribe(&pcm_of(160)).unwrap_err() {
            NovaVoxError::Run(RunError::NotReady { state }) => {
                assert_eq!(state, SessionState::Unloaded)
            }
            other => panic!("expected NotReady, got {other}"),
        }
    }

    #[test]
    fn run_failure_propagates() {
        let (session, _dir) = loaded_session(MockSttBackend::failing());
        let pipeline = TranscriptionPipeline::new(session, word_vocab());

        assert!(matches!(
            pipeline.transcribe(&pcm_of(160)).unwrap_err(),
            NovaVoxError::Run(RunError::Failed(_))
        ));
    }
}
