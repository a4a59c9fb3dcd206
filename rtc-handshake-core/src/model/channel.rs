use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Registry key of a wrapped channel. Labels are not unique, so adapters are tracked by this id.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
pub struct ChannelId(pub Uuid);

impl ChannelId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Options for a locally created data channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChannelOptions {
    pub ordered: Option<bool>,
    pub max_packet_life_time: Option<u16>,
    pub max_retransmits: Option<u16>,
    pub protocol: Option<String>,
    pub negotiated: Option<u16>,
    /// Send-buffer level under which the channel reports "buffer low".
    pub buffered_amount_low_threshold: Option<usize>,
}

impl ChannelOptions {
    pub fn unordered() -> Self {
        Self {
            ordered: Some(false),
            ..Self::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<&ChannelOptions> for webrtc::data_channel::data_channel_init::RTCDataChannelInit {
    fn from(options: &ChannelOptions) -> Self {
        Self {
            ordered: options.ordered,
            max_packet_life_time: options.max_packet_life_time,
            max_retransmits: options.max_retransmits,
            protocol: options.protocol.clone(),
            negotiated: options.negotiated,
            ..Default::default()
        }
    }
}

/// Inbound payload received on a data channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMessage {
    pub is_string: bool,
    pub data: Bytes,
}

impl ChannelMessage {
    pub fn binary(data: impl Into<Bytes>) -> Self {
        Self {
            is_string: false,
            data: data.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            is_string: true,
            data: Bytes::from(text.into()),
        }
    }

    /// Payload as UTF-8, if it is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<webrtc::data_channel::data_channel_message::DataChannelMessage> for ChannelMessage {
    fn from(msg: webrtc::data_channel::data_channel_message::DataChannelMessage) -> Self {
        Self {
            is_string: msg.is_string,
            data: msg.data,
        }
    }
}
