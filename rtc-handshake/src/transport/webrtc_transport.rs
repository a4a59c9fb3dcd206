use anyhow::{Context, Result};
use async_trait::async_trait;
use rtc_handshake_core::{ChannelOptions, ConnectionId, CoordinatorConfig, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_init::RTCDataChannelInit;
use webrtc::ice_transport::ice_candidate::RTCIceCandidate;
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

use crate::channel::{ChannelAdapter, DuplexChannel};
use crate::transport::{Transport, TransportEvent, WebRtcChannel};

/// [`Transport`] backed by a native `RTCPeerConnection`.
pub struct WebRtcTransport {
    connection_id: ConnectionId,
    peer_connection: Arc<RTCPeerConnection>,
}

impl WebRtcTransport {
    /// Builds the peer connection and routes its callbacks into `event_tx`.
    pub async fn new(
        connection_id: ConnectionId,
        config: &CoordinatorConfig,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Self> {
        // Codecs are registered even though only data channels are used.
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration::from(config);
        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();

                Box::pin(async move {
                    info!("Peer Connection State changed for {}: {}", connection_id, s);
                    let _ = tx
                        .send(TransportEvent::ConnectionStateChanged(s.into()))
                        .await;
                })
            },
        ));

        let ice_state_tx = event_tx.clone();
        peer_connection.on_ice_connection_state_change(Box::new(
            move |s: RTCIceConnectionState| {
                let tx = ice_state_tx.clone();

                Box::pin(async move {
                    debug!("ICE Connection State changed for {}: {}", connection_id, s);
                    let _ = tx
                        .send(TransportEvent::ConnectivityStateChanged(s.into()))
                        .await;
                })
            },
        ));

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();

            Box::pin(async move {
                let Some(candidate) = c else {
                    debug!("ICE gathering complete for {}", connection_id);
                    let _ = tx.send(TransportEvent::CandidateDiscovered(None)).await;
                    return;
                };
                let encoded = candidate
                    .to_json()
                    .map_err(anyhow::Error::from)
                    .and_then(|init| Ok(serde_json::to_string(&init)?));
                match encoded {
                    Ok(json) => {
                        let _ = tx.send(TransportEvent::CandidateDiscovered(Some(json))).await;
                    }
                    Err(e) => warn!("Failed to encode ICE candidate for {}: {:?}", connection_id, e),
                }
            })
        }));

        let dc_tx = event_tx;
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let tx = dc_tx.clone();

            Box::pin(async move {
                debug!(
                    "Remote DataChannel '{}' announced for {}",
                    dc.label(),
                    connection_id
                );
                // Wrapped here, before the native stack fires the channel's own callbacks.
                let adapter = ChannelAdapter::wrap(Arc::new(WebRtcChannel::new(dc))).await;
                let _ = tx.send(TransportEvent::IncomingChannel(adapter)).await;
            })
        }));

        Ok(Self {
            connection_id,
            peer_connection,
        })
    }

    pub fn peer_connection(&self) -> &Arc<RTCPeerConnection> {
        &self.peer_connection
    }
}

#[async_trait]
impl Transport for WebRtcTransport {
    async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(SessionDescription::try_from(offer)?)
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(SessionDescription::try_from(answer)?)
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()> {
        let desc = RTCSessionDescription::try_from(desc)?;
        self.peer_connection.set_local_description(desc).await?;
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()> {
        let desc = RTCSessionDescription::try_from(desc)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn local_description(&self) -> Option<SessionDescription> {
        let desc = self.peer_connection.local_description().await?;
        SessionDescription::try_from(desc).ok()
    }

    async fn create_channel(
        &self,
        label: &str,
        options: &ChannelOptions,
    ) -> Result<Arc<dyn DuplexChannel>> {
        let init = RTCDataChannelInit::from(options);
        let dc = self
            .peer_connection
            .create_data_channel(label, Some(init))
            .await?;
        debug!("Created DataChannel '{}' for {}", label, self.connection_id);

        Ok(Arc::new(WebRtcChannel::new(dc).with_buffered_amount_low_threshold(
            options.buffered_amount_low_threshold,
        )))
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}
