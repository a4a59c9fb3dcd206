mod channel;
mod config;
mod connection;
mod description;
mod phase;
mod state;

pub use channel::{ChannelId, ChannelMessage, ChannelOptions};
pub use config::{CoordinatorConfig, IceServerConfig};
pub use connection::ConnectionId;
pub use description::{SdpKind, SessionDescription};
pub use phase::{HandshakePhase, Role};
pub use state::{IceConnectionState, PeerConnectionState};
