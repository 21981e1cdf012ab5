//! Single-flight inference session
//!
//! The session owns the artifact and backend behind one `parking_lot::Mutex`;
//! every `load`/`run`/`unload` goes through that lock, so concurrent runs on
//! the same session never race over the native handle and `unload` always
//! waits out an in-flight run before releasing resources. The state cell is
//! a separate `RwLock` so `is_ready`/`state` stay observable while a run
//! holds the session lock.

use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};

use novavox_foundation::{
    BusyPolicy, LoadError, ModelKind, RunError, SessionState, UnloadError,
};

use crate::artifact::ModelArtifact;
use crate::ModelBackend;

/// Per-session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// What a second concurrent `run` observes (block vs fail fast).
    pub busy_policy: BusyPolicy,
    /// Context window passed through to LLM backends.
    pub context_size: u32,
    /// Worker threads for the native call.
    pub n_threads: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            busy_policy: BusyPolicy::Wait,
            context_size: 2048,
            n_threads: 4,
        }
    }
}

struct Inner<I, O> {
    backend: Box<dyn ModelBackend<Input = I, Output = O>>,
    artifact: Option<ModelArtifact>,
}

/// One loaded-model execution context for a single model kind.
pub struct InferenceSession<I, O> {
    kind: ModelKind,
    config: SessionConfig,
    state: RwLock<SessionState>,
    source: RwLock<Option<PathBuf>>,
    inner: Mutex<Inner<I, O>>,
}

impl<I, O> InferenceSession<I, O> {
    pub fn new(
        kind: ModelKind,
        config: SessionConfig,
        backend: Box<dyn ModelBackend<Input = I, Output = O>>,
    ) -> Self {
        Self {
            kind,
            config,
            state: RwLock::new(SessionState::Unloaded),
            source: RwLock::new(None),
            inner: Mutex::new(Inner {
                backend,
                artifact: None,
            }),
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == SessionState::Ready
    }

    /// Source path of the currently loaded artifact, if any.
    pub fn source_path(&self) -> Option<PathBuf> {
        self.source.read().clone()
    }

    fn transition(&self, next: SessionState) {
        let mut state = self.state.write();
        debug_assert!(
            state.can_transition(next),
            "invalid session state transition: {} -> {}",
            *state,
            next
        );
        tracing::debug!(kind = %self.kind, from = %*state, to = %next, "session state transition");
        *state = next;
    }

    /// Load the model artifact at `path` into this session.
    ///
    /// Returns `AlreadyLoaded` (leaving the existing handle untouched, no
    /// re-initialization) when the session is Ready. A failed load leaves
    /// the session in `Failed`, from which a fresh `load` may retry.
    pub fn load(&self, path: &Path) -> Result<(), LoadError> {
        let mut inner = self.inner.lock();
        // Transient states cannot be observed here: they are only held while
        // this same lock is held.
        if self.state() == SessionState::Ready {
            return Err(LoadError::AlreadyLoaded);
        }

        tracing::info!(kind = %self.kind, path = %path.display(), "loading model");
        self.transition(SessionState::Loading);

        let artifact = match ModelArtifact::read(path, self.kind) {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::warn!(kind = %self.kind, error = %e, "model load failed");
                self.transition(SessionState::Failed);
                return Err(e);
            }
        };
        if let Err(e) = inner.backend.load(&artifact, &self.config) {
            tracing::warn!(kind = %self.kind, error = %e, "backend initialization failed");
            self.transition(SessionState::Failed);
            return Err(e);
        }

        *self.source.write() = Some(path.to_path_buf());
        inner.artifact = Some(artifact);
        self.transition(SessionState::Ready);
        tracing::info!(kind = %self.kind, backend = inner.backend.id(), "model ready");
        Ok(())
    }

    /// Execute one inference. Single-flight: a concurrent caller either
    /// blocks or fails fast with `Busy` per the configured policy.
    pub fn run(&self, input: I) -> Result<O, RunError> {
        if !self.is_ready() {
            return Err(RunError::NotReady {
                state: self.state(),
            });
        }
        let mut inner = match self.config.busy_policy {
            BusyPolicy::Wait => self.inner.lock(),
            BusyPolicy::Fail => self.inner.try_lock().ok_or(RunError::Busy)?,
        };
        // The session may have been unloaded while we waited for the lock.
        if !self.is_ready() {
            return Err(RunError::NotReady {
                state: self.state(),
            });
        }
        inner.backend.run(input)
    }

    /// Release the model handle and return to `Unloaded`.
    ///
    /// Idempotent: a no-op on an unloaded session. Waits for any in-flight
    /// run (same lock) before releasing, so the handle is never observed
    /// after release.
    pub fn unload(&self) -> Result<(), UnloadError> {
        let mut inner = self.inner.lock();
        match self.state() {
            SessionState::Ready | SessionState::Failed => {}
            _ => return Ok(()),
        }

        tracing::info!(kind = %self.kind, "unloading model");
        self.transition(SessionState::Unloading);
        let result = inner.backend.unload();
        // The handle is dropped regardless of backend cleanup failure.
        inner.artifact = None;
        *self.source.write() = None;
        match result {
            Ok(()) => {
                self.transition(SessionState::Unloaded);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(kind = %self.kind, error = %e, "backend unload failed");
                self.transition(SessionState::Failed);
                Err(e)
            }
        }
    }
}
