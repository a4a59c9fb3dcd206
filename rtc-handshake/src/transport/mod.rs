mod transport;
mod transport_event;
mod webrtc_channel;
mod webrtc_transport;

pub use transport::*;
pub use transport_event::*;
pub use webrtc_channel::*;
pub use webrtc_transport::*;
