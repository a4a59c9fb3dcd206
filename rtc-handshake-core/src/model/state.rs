use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall peer connection state as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeerConnectionState {
    Unspecified,
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// State of the connectivity (ICE) agent as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IceConnectionState {
    Unspecified,
    New,
    Checking,
    Connected,
    Completed,
    Disconnected,
    Failed,
    Closed,
}

impl fmt::Display for PeerConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for IceConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{IceConnectionState, PeerConnectionState};
    use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
    use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;

    impl From<RTCPeerConnectionState> for PeerConnectionState {
        fn from(state: RTCPeerConnectionState) -> Self {
            match state {
                RTCPeerConnectionState::Unspecified => PeerConnectionState::Unspecified,
                RTCPeerConnectionState::New => PeerConnectionState::New,
                RTCPeerConnectionState::Connecting => PeerConnectionState::Connecting,
                RTCPeerConnectionState::Connected => PeerConnectionState::Connected,
                RTCPeerConnectionState::Disconnected => PeerConnectionState::Disconnected,
                RTCPeerConnectionState::Failed => PeerConnectionState::Failed,
                RTCPeerConnectionState::Closed => PeerConnectionState::Closed,
            }
        }
    }

    impl From<RTCIceConnectionState> for IceConnectionState {
        fn from(state: RTCIceConnectionState) -> Self {
            match state {
                RTCIceConnectionState::Unspecified => IceConnectionState::Unspecified,
                RTCIceConnectionState::New => IceConnectionState::New,
                RTCIceConnectionState::Checking => IceConnectionState::Checking,
                RTCIceConnectionState::Connected => IceConnectionState::Connected,
                RTCIceConnectionState::Completed => IceConnectionState::Completed,
                RTCIceConnectionState::Disconnected => IceConnectionState::Disconnected,
                RTCIceConnectionState::Failed => IceConnectionState::Failed,
                RTCIceConnectionState::Closed => IceConnectionState::Closed,
            }
        }
    }
}
