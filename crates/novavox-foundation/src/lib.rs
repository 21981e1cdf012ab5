//! Foundation types for the NovaVox on-device inference runtime
//!
//! This crate provides the shared vocabulary of the workspace: the model-kind
//! enum, the per-session state machine, the error taxonomy, and the runtime
//! configuration loaded from TOML.

pub mod config;
pub mod error;
pub mod state;
pub mod types;

pub use config::{BusyPolicy, LlmModelConfig, RuntimeConfig, SttModelConfig, TtsModelConfig};
pub use error::{
    AudioError, LoadError, NovaVoxError, RunError, UnloadAllError, UnloadError, VocabError,
};
pub use state::SessionState;
pub use types::ModelKind;
