//! Inference session lifecycle for NovaVox
//!
//! One [`InferenceSession`] per model kind owns the loaded [`ModelArtifact`],
//! drives the load/ready/failed/unload state machine, and serializes all
//! execution on a session-scoped lock (single-flight). Backends implement
//! [`ModelBackend`] to plug a native runtime behind the session; the
//! [`ModelRegistry`] aggregates status across the three sessions.

pub mod artifact;
pub mod registry;
pub mod session;

use std::marker::PhantomData;

use novavox_foundation::{LoadError, RunError, UnloadError};

pub use artifact::ModelArtifact;
pub use registry::{ManagedSession, ModelRegistry, RegistryStatus, SessionInfo};
pub use session::{InferenceSession, SessionConfig};

/// Seam between a session and the native runtime behind it.
///
/// The session guarantees calls are serialized: `load`, `run`, and `unload`
/// are never invoked concurrently on one backend. A backend must tolerate
/// `unload` without a prior successful `load`.
pub trait ModelBackend: Send {
    type Input;
    type Output;

    /// Short identifier for logs (e.g. "null", "mock").
    fn id(&self) -> &'static str;

    /// Initialize native resources from a validated artifact.
    fn load(&mut self, artifact: &ModelArtifact, config: &SessionConfig) -> Result<(), LoadError>;

    /// Execute one inference. Blocks until the native call returns; not
    /// externally interruptible.
    fn run(&mut self, input: Self::Input) -> Result<Self::Output, RunError>;

    /// Release native resources. Must be idempotent.
    fn unload(&mut self) -> Result<(), UnloadError>;
}

/// Backend with no native runtime behind it.
///
/// Accepts artifact loads (the artifact itself is still read and validated)
/// but reports `Unimplemented` on run rather than fabricating output.
pub struct NullBackend<I, O> {
    _marker: PhantomData<fn(I) -> O>,
}

impl<I, O> NullBackend<I, O> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<I, O> Default for NullBackend<I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, O> ModelBackend for NullBackend<I, O> {
    type Input = I;
    type Output = O;

    fn id(&self) -> &'static str {
        "null"
    }

    fn load(&mut self, _artifact: &ModelArtifact, _config: &SessionConfig) -> Result<(), LoadError> {
        Ok(())
    }

    fn run(&mut self, _input: I) -> Result<O, RunError> {
        Err(RunError::Unimplemented(
            "no native inference runtime configured for this session".to_string(),
        ))
    }

    fn unload(&mut self) -> Result<(), UnloadError> {
        Ok(())
    }
}
