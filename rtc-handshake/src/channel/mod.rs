mod channel_adapter;
mod channel_sink;
mod duplex_channel;

pub use channel_adapter::*;
pub use channel_sink::*;
pub use duplex_channel::*;
