//! Runtime configuration
//!
//! Deserialized from a TOML file with serde defaults, then overridden by
//! `NOVAVOX_*` environment variables for the model paths. Missing config
//! files fall back to `Default` so the runtime always starts with a coherent
//! configuration.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::NovaVoxError;

/// Behavior when `run` is called while another run is in flight on the same
/// session. Single-flight is enforced either way; this only selects what the
/// second caller observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BusyPolicy {
    /// Block until the in-flight run completes.
    #[default]
    Wait,
    /// Fail fast with `RunError::Busy`.
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttModelConfig {
    /// Path to the STT model artifact (ONNX-style payload)
    pub model_path: PathBuf,
    /// Path to the word-level decoder vocabulary (JSON)
    pub vocab_path: PathBuf,
}

impl Default for SttModelConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/parakeet-stt.onnx"),
            vocab_path: PathBuf::from("models/parakeet-vocab.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmModelConfig {
    /// Path to the GGUF model artifact
    pub model_path: PathBuf,
    /// Context window size passed to the backend
    pub context_size: u32,
    /// Worker threads for the native inference call
    pub n_threads: u32,
}

impl Default for LlmModelConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/lfm2.gguf"),
            context_size: 2048,
            n_threads: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsModelConfig {
    /// Path to the TTS model artifact (ONNX-style payload)
    pub model_path: PathBuf,
    /// Path to the character-level encoder vocabulary (JSON)
    pub vocab_path: PathBuf,
    /// Default voice preset name
    pub voice: String,
    /// Default speed multiplier (must stay positive; clamped at request time)
    pub speed: f32,
}

impl Default for TtsModelConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/kokoro-tts.onnx"),
            vocab_path: PathBuf::from("models/kokoro-vocab.json"),
            voice: "female".to_string(),
            speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub busy_policy: BusyPolicy,
    pub stt: SttModelConfig,
    pub llm: LlmModelConfig,
    pub tts: TtsModelConfig,
}

impl RuntimeConfig {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist. Environment overrides are applied afterwards.
    pub fn load(path: &Path) -> Result<Self, NovaVoxError> {
        let mut config = if path.is_file() {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| NovaVoxError::Config(format!("{}: {e}", path.display())))?;
            toml::from_str(&raw)
                .map_err(|e| NovaVoxError::Config(format!("{}: {e}", path.display())))?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Model-path overrides from the environment, highest precedence.
    fn apply_env_overrides(&mut self) {
        if let Ok(p) = env::var("NOVAVOX_STT_MODEL") {
            self.stt.model_path = PathBuf::from(p);
        }
        if let Ok(p) = env::var("NOVAVOX_LLM_MODEL") {
            self.llm.model_path = PathBuf::from(p);
        }
        if let Ok(p) = env::var("NOVAVOX_TTS_MODEL") {
            self.tts.model_path = PathBuf::from(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_coherent() {
        let config = RuntimeConfig::default();
        assert_eq!(config.busy_policy, BusyPolicy::Wait);
        assert_eq!(config.llm.context_size, 2048);
        assert_eq!(config.llm.n_threads, 4);
        assert_eq!(config.tts.voice, "female");
        assert!((config.tts.speed - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = RuntimeConfig::load(Path::new("/nonexistent/novavox.toml")).unwrap();
        assert_eq!(config.llm.context_size, RuntimeConfig::default().llm.context_size);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("novavox.toml");
        std::fs::write(
            &path,
            "busy_policy = \"fail\"\n[llm]\ncontext_size = 4096\n",
        )
        .unwrap();

        let config = RuntimeConfig::load(&path).unwrap();
        assert_eq!(config.busy_policy, BusyPolicy::Fail);
        assert_eq!(config.llm.context_size, 4096);
        assert_eq!(config.llm.n_threads, 4);
        assert_eq!(config.tts.voice, "female");
    }
}
