use rtc_handshake_core::{IceConnectionState, PeerConnectionState};

use crate::channel::ChannelAdapter;

/// Notifications a transport raises for its coordinator.
pub enum TransportEvent {
    /// A local candidate was found. `None` marks the end of gathering.
    CandidateDiscovered(Option<String>),

    ConnectionStateChanged(PeerConnectionState),

    ConnectivityStateChanged(IceConnectionState),

    /// The remote party opened a channel. Already wrapped, so no channel event is lost
    /// between the notification and the coordinator picking it up.
    IncomingChannel(ChannelAdapter),
}
