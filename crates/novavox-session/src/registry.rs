//! Process-wide model registry
//!
//! Tracks which of the three sessions are loaded, answers status queries,
//! and coordinates bulk unload. The registry holds the sessions only for
//! status aggregation and teardown; pipelines talk to their sessions
//! directly.

use std::sync::Arc;

use serde::Serialize;

use novavox_foundation::{ModelKind, SessionState, UnloadAllError, UnloadError};

use crate::session::InferenceSession;

/// Kind-erased view of a session, for aggregation across input/output types.
pub trait ManagedSession: Send + Sync {
    fn kind(&self) -> ModelKind;
    fn state(&self) -> SessionState;
    fn unload(&self) -> Result<(), UnloadError>;
    fn describe(&self) -> SessionInfo;

    fn is_ready(&self) -> bool {
        self.state() == SessionState::Ready
    }
}

impl<I: Send + 'static, O: Send + 'static> ManagedSession for InferenceSession<I, O> {
    fn kind(&self) -> ModelKind {
        InferenceSession::kind(self)
    }

    fn state(&self) -> SessionState {
        InferenceSession::state(self)
    }

    fn unload(&self) -> Result<(), UnloadError> {
        InferenceSession::unload(self)
    }

    fn describe(&self) -> SessionInfo {
        SessionInfo {
            kind: InferenceSession::kind(self),
            state: InferenceSession::state(self),
            source_path: self.source_path().map(|p| p.display().to_string()),
        }
    }
}

/// Introspection snapshot of one session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub kind: ModelKind,
    pub state: SessionState,
    pub source_path: Option<String>,
}

/// Loaded-flags for the three model kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStatus {
    pub stt: bool,
    pub llm: bool,
    pub tts: bool,
}

/// Registry over the three sessions.
#[derive(Default)]
pub struct ModelRegistry {
    sessions: Vec<Arc<dyn ManagedSession>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session, replacing any previous session of the same kind.
    pub fn register(&mut self, session: Arc<dyn ManagedSession>) {
        self.sessions.retain(|s| s.kind() != session.kind());
        self.sessions.push(session);
    }

    pub fn get(&self, kind: ModelKind) -> Option<&Arc<dyn ManagedSession>> {
        self.sessions.iter().find(|s| s.kind() == kind)
    }

    /// Whether the session of `kind` is loaded and ready.
    pub fn is_loaded(&self, kind: ModelKind) -> bool {
        self.get(kind).is_some_and(|s| s.is_ready())
    }

    pub fn status(&self) -> RegistryStatus {
        RegistryStatus {
            stt: self.is_loaded(ModelKind::Stt),
            llm: self.is_loaded(ModelKind::Llm),
            tts: self.is_loaded(ModelKind::Tts),
        }
    }

    pub fn describe(&self) -> Vec<SessionInfo> {
        self.sessions.iter().map(|s| s.describe()).collect()
    }

    /// Unload every registered session, best-effort.
    ///
    /// A failing unload does not abort the sweep: all remaining sessions are
    /// still attempted, and the failures are aggregated into one error.
    pub fn unload_all(&self) -> Result<(), UnloadAllError> {
        let mut failures = Vec::new();
        for session in &self.sessions {
            if let Err(e) = session.unload() {
                tracing::warn!(kind = %session.kind(), error = %e, "unload failed, continuing");
                failures.push((session.kind(), e));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(UnloadAllError { failures })
        }
    }
}
