//! Speech-to-text pipeline for NovaVox
//!
//! Composes the PCM codec, the STT inference session, and the shared
//! vocabulary table to turn raw PCM audio into text.

pub mod mock;
pub mod pipeline;

use novavox_audio::AudioBuffer;
use novavox_session::InferenceSession;

pub use pipeline::TranscriptionPipeline;

/// Token ids emitted by an STT run, decoded via the vocabulary.
pub type TokenIds = Vec<u32>;

/// STT session: audio in, token ids out.
pub type SttSession = InferenceSession<AudioBuffer, TokenIds>;
