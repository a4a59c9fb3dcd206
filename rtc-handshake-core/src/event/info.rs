use crate::model::{IceConnectionState, PeerConnectionState};
use std::fmt;

/// Observable transport-state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoKind {
    /// A local candidate was found. Carries the candidate in its JSON init form.
    NewCandidateDiscovered { candidate: String },
    /// The transport reported that no further local candidates will follow.
    AllCandidatesDiscovered,
    ConnectionStateChanged { state: PeerConnectionState },
    ConnectivityStateChanged { state: IceConnectionState },
}

impl InfoKind {
    pub fn description(&self) -> &'static str {
        match self {
            InfoKind::NewCandidateDiscovered { .. } => "new ice candidate",
            InfoKind::AllCandidatesDiscovered => "all ice candidates",
            InfoKind::ConnectionStateChanged { .. } => "connection state change",
            InfoKind::ConnectivityStateChanged { .. } => "ICE connection state change",
        }
    }
}

/// An [`InfoKind`] stamped with its position in the coordinator's emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoEvent {
    pub sequence: u64,
    pub kind: InfoKind,
}

impl fmt::Display for InfoEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.sequence, self.kind.description())?;
        match &self.kind {
            InfoKind::ConnectionStateChanged { state } => write!(f, ": {state}"),
            InfoKind::ConnectivityStateChanged { state } => write!(f, ": {state}"),
            _ => Ok(()),
        }
    }
}
