use rtc_handshake_core::{Cause, ChannelMessage};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use crate::stream::Topic;

pub(crate) struct ChannelBus {
    pub(crate) open: watch::Sender<bool>,
    /// Latches once the channel reports closed, whether or not it was ever open.
    pub(crate) closed: watch::Sender<bool>,
    pub(crate) messages: Topic<ChannelMessage>,
    pub(crate) errors: Topic<Cause>,
    pub(crate) buffer_low: Topic<()>,
}

impl ChannelBus {
    pub(crate) fn new(open: bool) -> Self {
        Self {
            open: watch::Sender::new(open),
            closed: watch::Sender::new(false),
            messages: Topic::new(),
            errors: Topic::new(),
            buffer_low: Topic::new(),
        }
    }
}

/// Listener handle a [`DuplexChannel`](crate::channel::DuplexChannel) forwards its
/// notifications into. Never blocks, so it is safe to call from any callback.
#[derive(Clone)]
pub struct ChannelSink {
    label: Arc<str>,
    bus: Arc<ChannelBus>,
}

impl ChannelSink {
    pub(crate) fn new(label: &str, bus: Arc<ChannelBus>) -> Self {
        Self {
            label: Arc::from(label),
            bus,
        }
    }

    pub fn opened(&self) {
        self.set_open(true);
    }

    pub fn closed(&self) {
        self.set_open(false);
        self.bus.closed.send_if_modified(|closed| !std::mem::replace(closed, true));
    }

    pub fn message(&self, msg: ChannelMessage) {
        self.bus.messages.publish(msg);
    }

    pub fn error(&self, cause: Cause) {
        debug!("DataChannel '{}' reported error: {}", self.label, cause);
        self.bus.errors.publish(cause);
    }

    pub fn buffered_amount_low(&self) {
        self.bus.buffer_low.publish(());
    }

    fn set_open(&self, open: bool) {
        let changed = self.bus.open.send_if_modified(|current| {
            let changed = *current != open;
            *current = open;
            changed
        });
        if changed {
            debug!("DataChannel '{}' open state -> {}", self.label, open);
        }
    }
}
