//! Handshake orchestration over a peer-to-peer transport.
//!
//! [`ConnectionCoordinator`] sequences the offer/answer exchange and waits for candidate
//! gathering to finish before handing a description to the caller, so the description
//! can be sent to the remote party as-is. Transport notifications are republished as
//! streams, and every data channel is exposed as a [`ChannelAdapter`].
//!
//! ```no_run
//! use rtc_handshake::{ConnectionCoordinator, CoordinatorConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let alice = ConnectionCoordinator::new(CoordinatorConfig::default()).await?;
//! let bob = ConnectionCoordinator::new(CoordinatorConfig::default()).await?;
//! let mut bob_channels = bob.data_channels();
//!
//! let offer = alice.initiate("chat", None).await?;
//! let answer = bob.join(offer.local_description().clone()).await?;
//! offer.apply_answer(answer.local_description().clone()).await?;
//!
//! if let Some(channel) = bob_channels.recv().await {
//!     let mut messages = channel.messages();
//!     offer.channel().wait_open(std::time::Duration::from_secs(5)).await?;
//!     offer.channel().send_text("hello").await?;
//!     let _hello = messages.recv().await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod coordinator;
pub mod stream;
pub mod transport;

pub use channel::{ChannelAdapter, ChannelSink, DuplexChannel};
pub use coordinator::{Answer, ConnectionCoordinator, GatheringGate, Offer};
pub use rtc_handshake_core::*;
pub use stream::{Subscription, Topic};
pub use transport::{Transport, TransportEvent, WebRtcChannel, WebRtcTransport};
