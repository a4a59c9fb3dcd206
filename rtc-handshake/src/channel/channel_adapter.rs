use anyhow::{Context, Result};
use bytes::Bytes;
use rtc_handshake_core::{Cause, ChannelId, ChannelMessage};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

use crate::channel::channel_sink::ChannelBus;
use crate::channel::{ChannelSink, DuplexChannel};
use crate::stream::Subscription;

/// One duplex channel with its callbacks turned into subscribable streams.
///
/// `open_state` is stateful: a new subscriber immediately sees the current value. The other
/// three streams are transient and only carry events emitted after subscribing.
#[derive(Clone)]
pub struct ChannelAdapter {
    id: ChannelId,
    label: String,
    channel: Arc<dyn DuplexChannel>,
    bus: Arc<ChannelBus>,
}

impl ChannelAdapter {
    /// Registers the adapter's listeners on `channel`.
    ///
    /// Wrapping the same channel twice replaces the first adapter's listeners.
    pub async fn wrap(channel: Arc<dyn DuplexChannel>) -> Self {
        let label = channel.label();
        let bus = Arc::new(ChannelBus::new(channel.is_open()));

        channel
            .attach(ChannelSink::new(&label, Arc::clone(&bus)))
            .await;

        let id = ChannelId::new();
        debug!("Wrapped DataChannel '{}' as {}", label, id);

        Self {
            id,
            label,
            channel,
            bus,
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn open_state(&self) -> watch::Receiver<bool> {
        self.bus.open.subscribe()
    }

    pub fn is_open(&self) -> bool {
        *self.bus.open.borrow()
    }

    /// Whether the channel has reported closed. Never resets.
    pub fn is_closed(&self) -> bool {
        *self.bus.closed.borrow()
    }

    pub(crate) fn closed_state(&self) -> watch::Receiver<bool> {
        self.bus.closed.subscribe()
    }

    pub fn messages(&self) -> Subscription<ChannelMessage> {
        self.bus.messages.subscribe()
    }

    pub fn errors(&self) -> Subscription<Cause> {
        self.bus.errors.subscribe()
    }

    pub fn send_buffer_low(&self) -> Subscription<()> {
        self.bus.buffer_low.subscribe()
    }

    /// Waits until the channel reports open.
    pub async fn wait_open(&self, timeout: Duration) -> Result<()> {
        let mut state = self.open_state();
        tokio::time::timeout(timeout, state.wait_for(|open| *open))
            .await
            .with_context(|| format!("DataChannel '{}' did not open in time", self.label))?
            .context("DataChannel dropped before opening")?;
        Ok(())
    }

    pub async fn send(&self, data: Bytes) -> Result<usize> {
        self.channel
            .send(&data)
            .await
            .with_context(|| format!("Failed to send on DataChannel '{}'", self.label))
    }

    pub async fn send_text(&self, text: impl Into<String>) -> Result<usize> {
        self.channel
            .send_text(text.into())
            .await
            .with_context(|| format!("Failed to send on DataChannel '{}'", self.label))
    }

    pub async fn buffered_amount(&self) -> usize {
        self.channel.buffered_amount().await
    }

    pub async fn close(&self) -> Result<()> {
        self.channel.close().await
    }
}

impl fmt::Debug for ChannelAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelAdapter")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("open", &self.is_open())
            .field("closed", &self.is_closed())
            .finish()
    }
}
