use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the negotiation a coordinator plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Initiator,
    Responder,
}

/// Handshake state machine of one coordinator.
///
/// `Idle -> Negotiating -> AwaitingCandidates -> Complete`. A failure at any step moves the
/// coordinator to `Failed`; a fresh coordinator is needed for another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandshakePhase {
    #[default]
    Idle,
    Negotiating(Role),
    AwaitingCandidates(Role),
    Complete(Role),
    Failed(Role),
}

impl HandshakePhase {
    pub fn role(&self) -> Option<Role> {
        match *self {
            HandshakePhase::Idle => None,
            HandshakePhase::Negotiating(role)
            | HandshakePhase::AwaitingCandidates(role)
            | HandshakePhase::Complete(role)
            | HandshakePhase::Failed(role) => Some(role),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, HandshakePhase::Idle)
    }
}

impl fmt::Display for HandshakePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandshakePhase::Idle => f.write_str("idle"),
            HandshakePhase::Negotiating(role) => write!(f, "negotiating ({role:?})"),
            HandshakePhase::AwaitingCandidates(role) => {
                write!(f, "awaiting candidates ({role:?})")
            }
            HandshakePhase::Complete(role) => write!(f, "complete ({role:?})"),
            HandshakePhase::Failed(role) => write!(f, "failed ({role:?})"),
        }
    }
}
