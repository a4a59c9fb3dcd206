use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Pranswer,
    Answer,
}

impl fmt::Display for SdpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SdpKind::Offer => "offer",
            SdpKind::Pranswer => "pranswer",
            SdpKind::Answer => "answer",
        };
        f.write_str(name)
    }
}

/// An offer or answer document, in the `{"type": ..., "sdp": ...}` shape browsers use,
/// so it can travel over whatever signaling path the caller picks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }

    pub fn is_offer(&self) -> bool {
        self.kind == SdpKind::Offer
    }

    pub fn is_answer(&self) -> bool {
        matches!(self.kind, SdpKind::Answer | SdpKind::Pranswer)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{SdpKind, SessionDescription};
    use crate::event::NegotiationFault;
    use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
    use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

    impl TryFrom<SessionDescription> for RTCSessionDescription {
        type Error = webrtc::Error;

        fn try_from(desc: SessionDescription) -> Result<Self, Self::Error> {
            match desc.kind {
                SdpKind::Offer => RTCSessionDescription::offer(desc.sdp),
                SdpKind::Pranswer => RTCSessionDescription::pranswer(desc.sdp),
                SdpKind::Answer => RTCSessionDescription::answer(desc.sdp),
            }
        }
    }

    impl TryFrom<RTCSessionDescription> for SessionDescription {
        type Error = NegotiationFault;

        fn try_from(desc: RTCSessionDescription) -> Result<Self, Self::Error> {
            let kind = match desc.sdp_type {
                RTCSdpType::Offer => SdpKind::Offer,
                RTCSdpType::Pranswer => SdpKind::Pranswer,
                RTCSdpType::Answer => SdpKind::Answer,
                other => return Err(NegotiationFault::UnsupportedDescription(other.to_string())),
            };
            Ok(Self {
                kind,
                sdp: desc.sdp,
            })
        }
    }
}
