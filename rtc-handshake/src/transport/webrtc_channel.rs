use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use rtc_handshake_core::{Cause, ChannelMessage};
use std::sync::Arc;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::data_channel::data_channel_state::RTCDataChannelState;

use crate::channel::{ChannelSink, DuplexChannel};

/// [`DuplexChannel`] over a native `RTCDataChannel`.
pub struct WebRtcChannel {
    inner: Arc<RTCDataChannel>,
    buffered_amount_low_threshold: Option<usize>,
}

impl WebRtcChannel {
    pub fn new(inner: Arc<RTCDataChannel>) -> Self {
        Self {
            inner,
            buffered_amount_low_threshold: None,
        }
    }

    pub fn with_buffered_amount_low_threshold(mut self, threshold: Option<usize>) -> Self {
        self.buffered_amount_low_threshold = threshold;
        self
    }

    pub fn raw(&self) -> &Arc<RTCDataChannel> {
        &self.inner
    }
}

#[async_trait]
impl DuplexChannel for WebRtcChannel {
    fn label(&self) -> String {
        self.inner.label().to_owned()
    }

    fn is_open(&self) -> bool {
        self.inner.ready_state() == RTCDataChannelState::Open
    }

    async fn attach(&self, sink: ChannelSink) {
        let open_sink = sink.clone();
        self.inner.on_open(Box::new(move || {
            open_sink.opened();
            Box::pin(async {})
        }));

        let close_sink = sink.clone();
        self.inner.on_close(Box::new(move || {
            close_sink.closed();
            Box::pin(async {})
        }));

        let message_sink = sink.clone();
        self.inner.on_message(Box::new(move |msg: DataChannelMessage| {
            message_sink.message(ChannelMessage::from(msg));
            Box::pin(async {})
        }));

        let error_sink = sink.clone();
        self.inner.on_error(Box::new(move |err: webrtc::Error| {
            error_sink.error(Cause::from(anyhow::Error::new(err)));
            Box::pin(async {})
        }));

        if let Some(threshold) = self.buffered_amount_low_threshold {
            self.inner
                .set_buffered_amount_low_threshold(threshold)
                .await;
        }

        let low_sink = sink;
        self.inner
            .on_buffered_amount_low(Box::new(move || {
                low_sink.buffered_amount_low();
                Box::pin(async {})
            }))
            .await;
    }

    async fn send(&self, data: &Bytes) -> Result<usize> {
        Ok(self.inner.send(data).await?)
    }

    async fn send_text(&self, text: String) -> Result<usize> {
        Ok(self.inner.send_text(text).await?)
    }

    async fn buffered_amount(&self) -> usize {
        self.inner.buffered_amount().await
    }

    async fn close(&self) -> Result<()> {
        self.inner.close().await?;
        Ok(())
    }
}
