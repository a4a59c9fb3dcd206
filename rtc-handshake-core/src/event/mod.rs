mod error;
mod info;

pub use error::{Cause, HandshakeError, NegotiationFault};
pub use info::{InfoEvent, InfoKind};
