//! Loop lifecycle state.

use serde::{Deserialize, Serialize};

/// State of the engagement loop.
///
/// `start()` moves Idle -> Running, `stop()` moves Running -> Idle.
/// Cancellation is cooperative: a cycle in flight finishes, only the next
/// scheduled cycle is prevented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopState {
    Idle,
    Running,
}

impl LoopState {
    /// Whether the loop is currently scheduled.
    pub fn is_running(&self) -> bool {
        matches!(self, LoopState::Running)
    }
}

impl Default for LoopState {
    fn default() -> Self {
        LoopState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(LoopState::default(), LoopState::Idle);
        assert!(!LoopState::default().is_running());
    }

    #[test]
    fn test_running_state() {
        assert!(LoopState::Running.is_running());
        assert!(!LoopState::Idle.is_running());
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&LoopState::Idle).unwrap(), "\"idle\"");
        assert_eq!(
            serde_json::to_string(&LoopState::Running).unwrap(),
            "\"running\""
        );
    }
}
