//! Text-to-speech pipeline for NovaVox
//!
//! Composes text normalization, the shared vocabulary, the TTS inference
//! session, the vocoder stage, and the PCM codec to turn text into audio,
//! with sentence-level chunking for streaming.

pub mod mock;
pub mod pipeline;
pub mod text;
pub mod voice;

use novavox_audio::MelSpectrogram;
use novavox_session::InferenceSession;

pub use pipeline::{SynthesisPipeline, SynthesisRequest, SynthesisStream};
pub use voice::Voice;

/// Input handed to a TTS backend: encoded token ids plus the speaker
/// embedding selected for the requested voice.
#[derive(Debug, Clone, PartialEq)]
pub struct TtsInput {
    pub token_ids: Vec<u32>,
    pub speaker_embedding: Vec<f32>,
}

/// TTS session: tokens + speaker in, mel intermediate out. The vocoder and
/// speed scaling live outside the session.
pub type TtsSession = InferenceSession<TtsInput, MelSpectrogram>;
