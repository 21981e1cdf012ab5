//! Error taxonomy for the inference runtime
//!
//! Every pipeline-level failure is surfaced to the caller as a typed result.
//! No component fabricates placeholder output (silence, fixed text) in place
//! of an error, and nothing here is retried internally.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::state::SessionState;
use crate::types::ModelKind;

/// Top-level error for the runtime, grouping the per-concern taxonomies.
#[derive(Debug, Error)]
pub enum NovaVoxError {
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    #[error("run error: {0}")]
    Run(#[from] RunError),

    #[error("unload error: {0}")]
    Unload(#[from] UnloadError),

    #[error("audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("vocabulary error: {0}")]
    Vocab(#[from] VocabError),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Failures while loading a model artifact into a session.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The resource path did not resolve to a file.
    #[error("model artifact not found: {path}")]
    NotFound { path: PathBuf },

    /// The artifact bytes failed their format signature check.
    #[error("model artifact is malformed: {0}")]
    Decode(String),

    /// Load was called while the session is already Ready. Informational and
    /// non-fatal: the existing handle is left untouched, nothing is
    /// re-initialized.
    #[error("model already loaded")]
    AlreadyLoaded,

    /// The backend rejected the artifact during its own initialization.
    #[error("backend failed to initialize: {0}")]
    Backend(String),

    #[error("I/O error reading artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while running inference on a session.
#[derive(Debug, Error)]
pub enum RunError {
    /// Inference was attempted while the session is not Ready.
    #[error("session is not ready (state: {state})")]
    NotReady { state: SessionState },

    /// Another run is in flight and the session is configured to fail fast.
    #[error("session is busy with another run")]
    Busy,

    /// The underlying inference call failed.
    #[error("inference failed: {0}")]
    Failed(String),

    /// The configured backend has no runtime behind it. Surfaced explicitly
    /// rather than returning fabricated output.
    #[error("inference stage not implemented: {0}")]
    Unimplemented(String),
}

/// Failure while releasing a session's resources.
#[derive(Debug, Error)]
pub enum UnloadError {
    #[error("backend failed to release resources: {0}")]
    Backend(String),
}

/// Aggregate failure from a best-effort `unload_all`.
///
/// Every session is attempted before this is surfaced; the vector lists each
/// kind that failed alongside its individual error.
#[derive(Debug)]
pub struct UnloadAllError {
    pub failures: Vec<(ModelKind, UnloadError)>,
}

impl fmt::Display for UnloadAllError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unload failed for ")?;
        for (i, (kind, err)) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{kind} ({err})")?;
        }
        Ok(())
    }
}

impl std::error::Error for UnloadAllError {}

/// Failures in PCM/float audio conversion and spectral intermediates.
#[derive(Debug, Error, PartialEq)]
pub enum AudioError {
    /// PCM16 byte buffers must have even length.
    #[error("malformed PCM buffer: odd byte length {len}")]
    MalformedBuffer { len: usize },

    /// Mel frames must all share one band count.
    #[error("malformed mel spectrogram: {0}")]
    MalformedSpectrogram(String),
}

/// Failures loading or using a vocabulary artifact.
#[derive(Debug, Error)]
pub enum VocabError {
    #[error("vocabulary file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("malformed vocabulary: {0}")]
    Malformed(String),

    /// The model emitted a token id outside the vocabulary. A real id/vocab
    /// mismatch, reported rather than rendered as guesswork.
    #[error("token id {0} is outside the vocabulary")]
    UnknownId(u32),

    #[error("I/O error reading vocabulary: {0}")]
    Io(#[from] std::io::Error),
}
