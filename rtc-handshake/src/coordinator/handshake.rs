use rtc_handshake_core::{HandshakeError, SessionDescription};
use std::fmt;
use std::sync::Arc;

use crate::channel::ChannelAdapter;
use crate::coordinator::connection_coordinator::CoordinatorShared;

/// Result of a successful `initiate`: the complete local offer, ready for the remote party.
pub struct Offer {
    local_description: SessionDescription,
    channel: ChannelAdapter,
    coordinator: Arc<CoordinatorShared>,
}

impl Offer {
    pub(crate) fn new(
        local_description: SessionDescription,
        channel: ChannelAdapter,
        coordinator: Arc<CoordinatorShared>,
    ) -> Self {
        Self {
            local_description,
            channel,
            coordinator,
        }
    }

    /// The offer for the remote/joining party. Candidate gathering has already finished.
    pub fn local_description(&self) -> &SessionDescription {
        &self.local_description
    }

    /// The channel created for this handshake (also published on `data_channels`).
    pub fn channel(&self) -> &ChannelAdapter {
        &self.channel
    }

    /// Applies the remote party's answer.
    pub async fn apply_answer(&self, answer: SessionDescription) -> Result<(), HandshakeError> {
        self.coordinator.apply_answer(answer).await
    }
}

impl fmt::Debug for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Offer")
            .field("local_description", &self.local_description)
            .field("channel", &self.channel)
            .finish()
    }
}

/// Result of a successful `join`.
#[derive(Debug, Clone)]
pub struct Answer {
    local_description: SessionDescription,
}

impl Answer {
    pub(crate) fn new(local_description: SessionDescription) -> Self {
        Self { local_description }
    }

    /// The answer for the remote/initiating party. Candidate gathering has already finished.
    pub fn local_description(&self) -> &SessionDescription {
        &self.local_description
    }

    pub fn into_local_description(self) -> SessionDescription {
        self.local_description
    }
}
