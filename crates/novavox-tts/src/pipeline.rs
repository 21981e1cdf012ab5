//! Text → tokens → TTS session → vocoder → audio

use std::sync::Arc;

use novavox_audio::{codec, AudioBuffer, Vocoder};
use novavox_foundation::NovaVoxError;
use novavox_vocab::Vocabulary;

use crate::text::{normalize, split_sentences};
use crate::voice::Voice;
use crate::{TtsInput, TtsSession};

/// A synthesis call: input text, voice preset, speed multiplier.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    text: String,
    voice: Voice,
    speed: f32,
}

impl SynthesisRequest {
    /// Build a request. Speed must stay positive: non-positive or non-finite
    /// values are clamped to 1.0.
    pub fn new(text: impl Into<String>, voice: Voice, speed: f32) -> Self {
        let speed = if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            tracing::debug!(speed, "invalid speed multiplier, clamping to 1.0");
            1.0
        };
        Self {
            text: text.into(),
            voice,
            speed,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn voice(&self) -> Voice {
        self.voice
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}

/// Turns text into PCM audio via the TTS session and the vocoder stage.
pub struct SynthesisPipeline {
    session: Arc<TtsSession>,
    vocab: Arc<Vocabulary>,
    vocoder: Vocoder,
}

impl SynthesisPipeline {
    pub fn new(session: Arc<TtsSession>, vocab: Arc<Vocabulary>, vocoder: Vocoder) -> Self {
        Self {
            session,
            vocab,
            vocoder,
        }
    }

    pub fn session(&self) -> &Arc<TtsSession> {
        &self.session
    }

    /// Synthesize the request's text as one chunk.
    pub fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioBuffer, NovaVoxError> {
        let normalized = normalize(request.text());
        let token_ids = self.vocab.encode(&normalized);
        tracing::debug!(
            tokens = token_ids.len(),
            voice = request.voice().name(),
            speed = request.speed(),
            "synthesizing chunk"
        );
        let mel = self.session.run(TtsInput {
            token_ids,
            speaker_embedding: request.voice().speaker_embedding(),
        })?;
        // Speed scaling is the vocoder's contract, not the inference step's.
        Ok(self.vocoder.synthesize(&mel, request.speed()))
    }

    /// Synthesize the request and encode the waveform as PCM16 wire bytes.
    pub fn synthesize_pcm(&self, request: &SynthesisRequest) -> Result<Vec<u8>, NovaVoxError> {
        let audio = self.synthesize(request)?;
        Ok(codec::float_to_pcm16(audio.samples()))
    }

    /// Lazily synthesize one buffer per sentence of `text`.
    ///
    /// The stream is finite and restartable by re-invoking this method; it
    /// is not resumable mid-stream.
    pub fn synthesize_stream(&self, text: &str, voice: Voice, speed: f32) -> SynthesisStream<'_> {
        let chunks = split_sentences(text);
        tracing::debug!(chunks = chunks.len(), "starting synthesis stream");
        SynthesisStream {
            pipeline: self,
            chunks: chunks.into_iter(),
            voice,
            speed,
        }
    }
}

/// Finite lazy sequence of per-sentence audio buffers.
pub struct SynthesisStream<'a> {
    pipeline: &'a SynthesisPipeline,
    chunks: std::vec::IntoIter<String>,
    voice: Voice,
    speed: f32,
}

impl Iterator for SynthesisStream<'_> {
    type Item = Result<AudioBuffer, NovaVoxError>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunks.next()?;
        let request = SynthesisRequest::new(chunk, self.voice, self.speed);
        Some(self.pipeline.synthesize(&request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use novavox_audio::HOP_LENGTH;
    use novavox_foundation::{ModelKind, RunError};
    use novavox_session::{InferenceSession, SessionConfig};
    use novavox_vocab::TokenLevel;

    use crate::mock::MockTtsBackend;
    use crate::voice::SPEAKER_EMBEDDING_DIM;

    fn char_vocab() -> Arc<Vocabulary> {
        let mut units = HashMap::new();
        let specials = ["<pad>", "<eos>", "<unk>"];
        for (i, u) in specials.iter().enumerate() {
            units.insert(u.to_string(), i as u32);
        }
        for (i, c) in "abcdefghijklmnopqrstuvwxyz. ".chars().enumerate() {
            units.insert(c.to_string(), (specials.len() + i) as u32);
        }
        Vocabulary::from_parts(units, 0, 1, 2, TokenLevel::Char)
            .unwrap()
            .shared()
    }

    fn loaded_pipeline(backend: MockTtsBackend) -> (SynthesisPipeline, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tts.onnx");
        std::fs::write(&path, [0x08, 0x07, 0x12, 0x00, 1, 2, 3, 4]).unwrap();
        let session = Arc::new(InferenceSession::new(
            ModelKind::Tts,
            SessionConfig::default(),
            Box::new(backend),
        ));
        session.load(&path).unwrap();
        (
            SynthesisPipeline::new(session, char_vocab(), Vocoder::default()),
            dir,
        )
    }

    #[test]
    fn output_length_follows_vocoder_contract() {
        let (pipeline, _dir) = loaded_pipeline(MockTtsBackend::new());
        // One mel frame per token; "hi." normalizes to 3 tokens.
        let unity = pipeline
            .synthesize(&SynthesisRequest::new("hi.", Voice::Female, 1.0))
            .unwrap();
        assert_eq!(unity.len(), 3 * HOP_LENGTH);

        let double = pipeline
            .synthesize(&SynthesisRequest::new("hi.", Voice::Female, 2.0))
            .unwrap();
        assert_eq!(double.len(), 3 * HOP_LENGTH / 2);
    }

    #[test]
    fn text_is_normalized_before_encoding() {
        let (pipeline, _dir) = loaded_pipeline(MockTtsBackend::new());
        let upper = pipeline
            .synthesize(&SynthesisRequest::new("  HELLO  world ", Voice::Female, 1.0))
            .unwrap();
        let lower = pipeline
            .synthesize(&SynthesisRequest::new("hello world", Voice::Female, 1.0))
            .unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn backend_receives_selected_speaker_embedding() {
        let backend = MockTtsBackend::new();
        let captured = backend.captured();
        let (pipeline, _dir) = loaded_pipeline(backend);

        pipeline
            .synthesize(&SynthesisRequest::new("hi.", Voice::Male, 1.0))
            .unwrap();
        let input = captured.lock().unwrap().clone().unwrap();
        assert_eq!(input.speaker_embedding, vec![0.5; SPEAKER_EMBEDDING_DIM]);
    }

    #[test]
    fn stream_yields_one_buffer_per_sentence() {
        let (pipeline, _dir) = loaded_pipeline(MockTtsBackend::new());
        let buffers: Vec<_> = pipeline
            .synthesize_stream("Hello world. How are you? Fine!", Voice::Female, 1.0)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(buffers.len(), 3);
        assert!(buffers.iter().all(|b| !b.is_empty()));
    }

    #[test]
    fn stream_is_restartable() {
        let (pipeline, _dir) = loaded_pipeline(MockTtsBackend::new());
        let text = "One. Two.";
        let first: Vec<_> = pipeline
            .synthesize_stream(text, Voice::Female, 1.0)
            .collect::<Result<_, _>>()
            .unwrap();
        let second: Vec<_> = pipeline
            .synthesize_stream(text, Voice::Female, 1.0)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_text_synthesizes_empty_audio() {
        let (pipeline, _dir) = loaded_pipeline(MockTtsBackend::new());
        let audio = pipeline
            .synthesize(&SynthesisRequest::new("", Voice::Female, 1.0))
            .unwrap();
        assert!(audio.is_empty());
        assert_eq!(
            pipeline
                .synthesize_stream("", Voice::Female, 1.0)
                .count(),
            0
        );
    }

    #[test]
    fn run_failure_propagates_not_silence() {
        let (pipeline, _dir) = loaded_pipeline(MockTtsBackend::failing());
        assert!(matches!(
            pipeline
                .synthesize(&SynthesisRequest::new("hi.", Voice::Female, 1.0))
                .unwrap_err(),
            NovaVoxError::Run(RunError::Failed(_))
        ));
    }

    #[test]
    fn unloaded_session_reports_not_ready() {
        let session = Arc::new(InferenceSession::new(
            ModelKind::Tts,
            SessionConfig::default(),
            Box::new(MockTtsBackend::new()),
        ));
        let pipeline = SynthesisPipeline::new(session, char_vocab(), Vocoder::default());
        assert!(matches!(
            pipeline
                .synthesize(&SynthesisRequest::new("hi.", Voice::Female, 1.0))
                .unwrap_err(),
            NovaVoxError::Run(RunError::NotReady { .. })
        ));
    }

    #[test]
    fn non_positive_speed_is_clamped_at_request_time() {
        let request = SynthesisRequest::new("hi.", Voice::Female, -2.0);
        assert_eq!(request.speed(), 1.0);
    }
}
