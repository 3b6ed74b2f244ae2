//! SessionStatus enum for tracking the lifecycle of a viewer connection.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a viewer session.
///
/// ```text
/// Connecting ──► Open ──► Closing ──► Closed
///      │                     ▲
///      └─────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Connecting,
    Open,
    Closing,
    Closed,
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!(
            (self, target),
            (Connecting, Open) | (Connecting, Closing) | (Open, Closing) | (Closing, Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            Connecting => vec![Open, Closing],
            Open => vec![Closing],
            Closing => vec![Closed],
            Closed => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Connecting => "CONNECTING",
            SessionStatus::Open => "OPEN",
            SessionStatus::Closing => "CLOSING",
            SessionStatus::Closed => "CLOSED",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_connecting() {
        assert_eq!(SessionStatus::default(), SessionStatus::Connecting);
    }

    #[test]
    fn happy_path_is_valid() {
        let status = SessionStatus::Connecting
            .transition_to(SessionStatus::Open)
            .and_then(|s| s.transition_to(SessionStatus::Closing))
            .and_then(|s| s.transition_to(SessionStatus::Closed));
        assert_eq!(status, Ok(SessionStatus::Closed));
    }

    #[test]
    fn failed_handshake_goes_through_closing() {
        assert!(SessionStatus::Connecting.can_transition_to(&SessionStatus::Closing));
        assert!(!SessionStatus::Connecting.can_transition_to(&SessionStatus::Closed));
    }

    #[test]
    fn open_cannot_skip_closing() {
        assert!(SessionStatus::Open
            .transition_to(SessionStatus::Closed)
            .is_err());
    }

    #[test]
    fn closed_is_terminal() {
        assert!(SessionStatus::Closed.is_terminal());
        assert!(!SessionStatus::Closing.is_terminal());
    }

    #[test]
    fn display_uses_upper_case() {
        assert_eq!(SessionStatus::Closing.to_string(), "CLOSING");
    }
}
