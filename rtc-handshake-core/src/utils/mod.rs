use std::time::Duration;

pub const DEFAULT_STUN_ADDR: &str = "stun:stun.stunprotocol.org";

pub const DEFAULT_GATHERING_TIMEOUT: Duration = Duration::from_secs(15);

pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_EVENT_BUFFER: usize = 256;
