//! Text generation pipeline for NovaVox
//!
//! Formats a structured conversation into the model's turn transcript,
//! clamps sampling parameters, and runs the LLM inference session.

pub mod mock;
pub mod pipeline;
pub mod prompt;
pub mod sampling;

use novavox_session::InferenceSession;

pub use pipeline::{GenerationPipeline, GenerationRequest};
pub use prompt::Turn;
pub use sampling::SamplingParams;

/// Input handed to an LLM backend: the fully formatted transcript plus the
/// (already clamped) sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmInput {
    pub prompt: String,
    pub params: SamplingParams,
}

/// LLM session: formatted prompt in, completion text out.
pub type LlmSession = InferenceSession<LlmInput, String>;
