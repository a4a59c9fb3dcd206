use anyhow::Result;
use async_trait::async_trait;
use rtc_handshake_core::{ChannelOptions, SessionDescription};
use std::sync::Arc;

use crate::channel::DuplexChannel;

/// The peer-to-peer primitive a coordinator drives.
///
/// Notifications (candidates, state changes, remote channels) are not part of this trait:
/// an implementation pushes them as [`TransportEvent`](crate::transport::TransportEvent)s
/// into the queue it was constructed with.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()>;

    /// The current local description, including every candidate gathered so far.
    async fn local_description(&self) -> Option<SessionDescription>;

    async fn create_channel(
        &self,
        label: &str,
        options: &ChannelOptions,
    ) -> Result<Arc<dyn DuplexChannel>>;

    async fn close(&self) -> Result<()>;
}
