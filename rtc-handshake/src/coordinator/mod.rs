mod connection_coordinator;
mod gathering_gate;
mod handshake;

pub use connection_coordinator::*;
pub use gathering_gate::*;
pub use handshake::*;
