//! Conversation → LLM session → completion

use std::sync::Arc;

use novavox_foundation::NovaVoxError;

use crate::prompt::{format_transcript, sanitize, Turn};
use crate::sampling::SamplingParams;
use crate::{LlmInput, LlmSession};

/// A generation call: prompt, system prompt, conversation history, and
/// sampling parameters.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_prompt: String,
    pub history: Vec<Turn>,
    pub params: SamplingParams,
}

/// Turns a structured conversation into a text completion.
pub struct GenerationPipeline {
    session: Arc<LlmSession>,
}

impl GenerationPipeline {
    pub fn new(session: Arc<LlmSession>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<LlmSession> {
        &self.session
    }

    /// Generate a completion for the request.
    ///
    /// Sampling parameters are clamped silently (documented policy, see
    /// [`SamplingParams::clamped`]); prompt text is sanitized of control
    /// characters before formatting.
    pub fn generate(&self, request: &GenerationRequest) -> Result<String, NovaVoxError> {
        let params = request.params.clamped();

        let system = sanitize(&request.system_prompt);
        let current = sanitize(&request.prompt);
        let history: Vec<Turn> = request
            .history
            .iter()
            .map(|t| Turn::new(sanitize(&t.user), sanitize(&t.assistant)))
            .collect();

        let prompt = format_transcript(&system, &history, &current);
        tracing::debug!(
            prompt_len = prompt.len(),
            history_turns = history.len(),
            max_tokens = params.max_tokens,
            "running generation"
        );

        let completion = self.session.run(LlmInput { prompt, params })?;
        Ok(completion.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use novavox_foundation::{ModelKind, RunError};
    use novavox_session::{InferenceSession, SessionConfig};

    use crate::mock::MockLlmBackend;

    fn loaded_pipeline(backend: MockLlmBackend) -> (GenerationPipeline, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llm.gguf");
        std::fs::write(&path, b"GGUF\x03\x00\x00\x00payload").unwrap();
        let session = Arc::new(InferenceSession::new(
            ModelKind::Llm,
            SessionConfig::default(),
            Box::new(backend),
        ));
        session.load(&path).unwrap();
        (GenerationPipeline::new(session), dir)
    }

    fn request_with(params: SamplingParams) -> GenerationRequest {
        GenerationRequest {
            prompt: "What time is it?".to_string(),
            system_prompt: "You are a voice assistant.".to_string(),
            history: vec![Turn::new("Hi", "Hello!")],
            params,
        }
    }

    #[test]
    fn completion_is_trimmed() {
        let backend = MockLlmBackend::with_reply("  half past nine \n");
        let (pipeline, _dir) = loaded_pipeline(backend);
        let reply = pipeline.generate(&request_with(SamplingParams::default())).unwrap();
        assert_eq!(reply, "half past nine");
    }

    #[test]
    fn overlarge_temperature_behaves_like_max() {
        let backend = MockLlmBackend::with_reply("ok");
        let captured = backend.captured();
        let (pipeline, _dir) = loaded_pipeline(backend);

        pipeline
            .generate(&request_with(SamplingParams {
                temperature: 5.0,
                ..SamplingParams::default()
            }))
            .unwrap();
        let extreme = captured.lock().unwrap().clone().unwrap();

        pipeline
            .generate(&request_with(SamplingParams {
                temperature: 2.0,
                ..SamplingParams::default()
            }))
            .unwrap();
        let max = captured.lock().unwrap().clone().unwrap();

        assert_eq!(extreme, max);
        assert_eq!(max.params.temperature, 2.0);
    }

    #[test]
    fn negative_top_p_behaves_like_zero() {
        let backend = MockLlmBackend::with_reply("ok");
        let captured = backend.captured();
        let (pipeline, _dir) = loaded_pipeline(backend);

        pipeline
            .generate(&request_with(SamplingParams {
                top_p: -1.0,
                ..SamplingParams::default()
            }))
            .unwrap();
        let negative = captured.lock().unwrap().clone().unwrap();

        pipeline
            .generate(&request_with(SamplingParams {
                top_p: 0.0,
                ..SamplingParams::default()
            }))
            .unwrap();
        let zero = captured.lock().unwrap().clone().unwrap();

        assert_eq!(negative, zero);
        assert_eq!(zero.params.top_p, 0.0);
    }

    #[test]
    fn backend_sees_sanitized_framed_transcript() {
        let backend = MockLlmBackend::with_reply("ok");
        let captured = backend.captured();
        let (pipeline, _dir) = loaded_pipeline(backend);

        let request = GenerationRequest {
            prompt: "now\u{0}?".to_string(),
            system_prompt: " be brief ".to_string(),
            history: Vec::new(),
            params: SamplingParams::default(),
        };
        pipeline.generate(&request).unwrap();

        let input = captured.lock().unwrap().clone().unwrap();
        assert_eq!(
            input.prompt,
            "<|system|>\nbe brief\n<|end|>\n<|user|>\nnow?\n<|end|>\n<|assistant|>"
        );
    }

    #[test]
    fn unloaded_session_reports_not_ready() {
        let session = Arc::new(InferenceSession::new(
            ModelKind::Llm,
            SessionConfig::default(),
            Box::new(MockLlmBackend::with_reply("ok")),
        ));
        let pipeline = GenerationPipeline::new(session);
        assert!(matches!(
            pipeline
                .generate(&request_with(SamplingParams::default()))
                .unwrap_err(),
            NovaVoxError::Run(RunError::NotReady { .. })
        ));
    }
}
