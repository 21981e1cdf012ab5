//! Mock LLM backend for pipeline tests

use std::sync::{Arc, Mutex};

use novavox_foundation::{LoadError, RunError, UnloadError};
use novavox_session::{ModelArtifact, ModelBackend, SessionConfig};

use crate::LlmInput;

/// Scripted LLM backend: returns a fixed reply and records the exact input
/// it received, so tests can assert on the framed prompt and the effective
/// sampling parameters.
#[derive(Debug)]
pub struct MockLlmBackend {
    reply: String,
    fail_run: bool,
    captured: Arc<Mutex<Option<LlmInput>>>,
}

impl MockLlmBackend {
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            fail_run: false,
            captured: Arc::new(Mutex::new(None)),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            fail_run: true,
            captured: Arc::new(Mutex::new(None)),
        }
    }

    /// Handle to the last input seen by `run`.
    pub fn captured(&self) -> Arc<Mutex<Option<LlmInput>>> {
        self.captured.clone()
    }
}

impl ModelBackend for MockLlmBackend {
    type Input = LlmInput;
    type Output = String;

    fn id(&self) -> &'static str {
        "mock-llm"
    }

    fn load(&mut self, _artifact: &ModelArtifact, _config: &SessionConfig) -> Result<(), LoadError> {
        Ok(())
    }

    fn run(&mut self, input: LlmInput) -> Result<String, RunError> {
        *self.captured.lock().unwrap() = Some(input);
        if self.fail_run {
            return Err(RunError::Failed("scripted generation failure".to_string()));
        }
        Ok(self.reply.clone())
    }

    fn unload(&mut self) -> Result<(), UnloadError> {
        Ok(())
    }
}
