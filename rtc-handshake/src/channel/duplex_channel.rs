use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use crate::channel::ChannelSink;

/// A raw bidirectional message pipe, as handed out by the transport.
#[async_trait]
pub trait DuplexChannel: Send + Sync + 'static {
    fn label(&self) -> String;

    /// Whether the transport currently reports the channel as open.
    fn is_open(&self) -> bool;

    /// Registers `sink` as the receiver of every open, close, message, error and
    /// buffer-low notification of this channel. Called once per channel.
    async fn attach(&self, sink: ChannelSink);

    async fn send(&self, data: &Bytes) -> Result<usize>;

    async fn send_text(&self, text: String) -> Result<usize>;

    async fn buffered_amount(&self) -> usize;

    async fn close(&self) -> Result<()>;
}
