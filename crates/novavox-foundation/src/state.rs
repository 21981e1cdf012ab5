//! Per-session lifecycle state machine

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of an inference session.
///
/// `Ready` is the only state from which inference may run. `Loading` and
/// `Unloading` are transient and held only for the duration of the
/// corresponding call. `Failed` is reachable from a failed load and permits
/// retry via a fresh `load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Unloaded,
    Loading,
    Ready,
    Failed,
    Unloading,
}

impl SessionState {
    /// Whether a transition from `self` to `next` is permitted.
    pub fn can_transition(&self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Unloaded, Loading)
                | (Failed, Loading)
                | (Loading, Ready)
                | (Loading, Failed)
                | (Ready, Unloading)
                | (Failed, Unloading)
                | (Unloading, Unloaded)
                | (Unloading, Failed)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Unloaded => "unloaded",
            SessionState::Loading => "loading",
            SessionState::Ready => "ready",
            SessionState::Failed => "failed",
            SessionState::Unloading => "unloading",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionState::*;

    #[test]
    fn load_path_transitions() {
        assert!(Unloaded.can_transition(Loading));
        assert!(Loading.can_transition(Ready));
        assert!(Loading.can_transition(Failed));
        assert!(Failed.can_transition(Loading));
    }

    #[test]
    fn unload_path_transitions() {
        assert!(Ready.can_transition(Unloading));
        assert!(Failed.can_transition(Unloading));
        assert!(Unloading.can_transition(Unloaded));
    }

    #[test]
    fn inference_never_starts_from_non_ready() {
        assert!(!Unloaded.can_transition(Ready));
        assert!(!Ready.can_transition(Loading));
        assert!(!Unloaded.can_transition(Unloading));
    }
}
