use anyhow::Result;
use dashmap::DashMap;
use rtc_handshake_core::{
    ChannelId, ChannelOptions, ConnectionId, CoordinatorConfig, HandshakeError, HandshakePhase,
    InfoEvent, InfoKind, NegotiationFault, Role, SdpKind, SessionDescription,
};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::channel::ChannelAdapter;
use crate::coordinator::{Answer, GatheringGate, Offer};
use crate::stream::{Subscription, Topic};
use crate::transport::{Transport, TransportEvent, WebRtcTransport};

/// State shared between the coordinator, its event pump and the handshake results.
pub(crate) struct CoordinatorShared {
    id: ConnectionId,
    config: CoordinatorConfig,
    transport: Arc<dyn Transport>,
    phase: watch::Sender<HandshakePhase>,
    gate: GatheringGate,
    channels: DashMap<ChannelId, ChannelAdapter>,
    data_channels: Topic<ChannelAdapter>,
    info: Topic<InfoEvent>,
    errors: Topic<HandshakeError>,
    sequence: AtomicU64,
}

/// Drives the offer/answer handshake over one transport and republishes its notifications
/// as streams.
///
/// One coordinator serves one negotiation: `initiate` or `join` may succeed once, after
/// which (or after a failure) a new coordinator is needed.
///
/// The event pump runs for as long as the coordinator or an [`Offer`] from it is alive,
/// so streams subscribed earlier keep receiving events while an offer is still held.
pub struct ConnectionCoordinator {
    shared: Arc<CoordinatorShared>,
}

impl ConnectionCoordinator {
    /// Creates a coordinator over a fresh `webrtc` peer connection.
    pub async fn new(config: CoordinatorConfig) -> Result<Self> {
        let id = ConnectionId::new();
        let (event_tx, event_rx) = mpsc::channel(config.event_buffer.max(1));
        let transport = WebRtcTransport::new(id, &config, event_tx).await?;

        Ok(Self::assemble(id, Arc::new(transport), event_rx, config))
    }

    /// Creates a coordinator over any transport. `events` must be the queue the transport
    /// pushes its notifications into. Must be called inside a tokio runtime.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        events: mpsc::Receiver<TransportEvent>,
        config: CoordinatorConfig,
    ) -> Self {
        Self::assemble(ConnectionId::new(), transport, events, config)
    }

    fn assemble(
        id: ConnectionId,
        transport: Arc<dyn Transport>,
        events: mpsc::Receiver<TransportEvent>,
        config: CoordinatorConfig,
    ) -> Self {
        let shared = Arc::new(CoordinatorShared {
            id,
            config,
            transport,
            phase: watch::Sender::new(HandshakePhase::Idle),
            gate: GatheringGate::new(),
            channels: DashMap::new(),
            data_channels: Topic::new(),
            info: Topic::new(),
            errors: Topic::new(),
            sequence: AtomicU64::new(0),
        });

        tokio::spawn(run_event_pump(Arc::downgrade(&shared), events));
        debug!("Coordinator {} created", id);

        Self { shared }
    }

    pub fn id(&self) -> ConnectionId {
        self.shared.id
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.shared.config
    }

    pub fn phase(&self) -> HandshakePhase {
        *self.shared.phase.borrow()
    }

    pub fn phase_changes(&self) -> watch::Receiver<HandshakePhase> {
        self.shared.phase.subscribe()
    }

    /// Every channel that becomes available: the one created by `initiate` and every
    /// channel the remote party opens.
    pub fn data_channels(&self) -> Subscription<ChannelAdapter> {
        self.shared.data_channels.subscribe()
    }

    pub fn info(&self) -> Subscription<InfoEvent> {
        self.shared.info.subscribe()
    }

    /// Handshake-phase failures. Channel errors live on each channel's own stream.
    pub fn errors(&self) -> Subscription<HandshakeError> {
        self.shared.errors.subscribe()
    }

    /// Channels published so far that have not closed yet.
    pub fn channels(&self) -> Vec<ChannelAdapter> {
        self.shared
            .channels
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn channel(&self, id: ChannelId) -> Option<ChannelAdapter> {
        self.shared.channels.get(&id).map(|entry| entry.value().clone())
    }

    /// Number of candidate-gathering rounds completed so far.
    pub fn gathering_completions(&self) -> usize {
        self.shared.gate.completions()
    }

    /// Starts the handshake as the initiating side.
    ///
    /// The channel is created and published on `data_channels` before negotiation starts.
    /// Resolves once the local offer is set and candidate gathering has finished, so the
    /// returned description is complete and can be handed to the remote party.
    pub async fn initiate(
        &self,
        label: &str,
        options: Option<ChannelOptions>,
    ) -> Result<Offer, HandshakeError> {
        let options = options.unwrap_or_default();
        info!(
            "Initiating handshake on {} with DataChannel '{}'",
            self.shared.id, label
        );

        self.shared
            .negotiate_offer(label, &options)
            .await
            .map_err(|e| {
                self.shared
                    .fail(Role::Initiator, HandshakeError::InitiateFailed(e.into()))
            })
    }

    /// Joins a handshake started by the remote party with `offer`.
    ///
    /// Channels the remote party opens arrive on `data_channels`, not through the result.
    pub async fn join(&self, offer: SessionDescription) -> Result<Answer, HandshakeError> {
        info!("Joining handshake on {}", self.shared.id);

        self.shared
            .negotiate_answer(offer)
            .await
            .map_err(|e| {
                self.shared
                    .fail(Role::Responder, HandshakeError::JoinFailed(e.into()))
            })
    }

    /// Closes the underlying transport.
    pub async fn close(&self) -> Result<()> {
        info!("Closing coordinator {}", self.shared.id);
        self.shared.transport.close().await
    }
}

/// Stops at the first event after the last handle on the shared state is gone, or when
/// the transport drops its end of the queue.
async fn run_event_pump(
    shared: Weak<CoordinatorShared>,
    mut events: mpsc::Receiver<TransportEvent>,
) {
    while let Some(event) = events.recv().await {
        let Some(shared) = shared.upgrade() else {
            debug!("Coordinator dropped, stopping event pump");
            return;
        };
        shared.handle_transport_event(event);
    }
    debug!("Transport event queue closed");
}

impl CoordinatorShared {
    fn handle_transport_event(self: &Arc<Self>, event: TransportEvent) {
        match event {
            TransportEvent::CandidateDiscovered(Some(candidate)) => {
                self.publish_info(InfoKind::NewCandidateDiscovered { candidate });
            }

            TransportEvent::CandidateDiscovered(None) => {
                self.publish_info(InfoKind::AllCandidatesDiscovered);
                if !self.gate.complete() {
                    debug!("Ignoring repeated gathering completion on {}", self.id);
                }
            }

            TransportEvent::ConnectionStateChanged(state) => {
                self.publish_info(InfoKind::ConnectionStateChanged { state });
            }

            TransportEvent::ConnectivityStateChanged(state) => {
                self.publish_info(InfoKind::ConnectivityStateChanged { state });
            }

            TransportEvent::IncomingChannel(channel) => {
                info!(
                    "Remote DataChannel '{}' available on {}",
                    channel.label(),
                    self.id
                );
                self.adopt_channel(channel);
            }
        }
    }

    fn publish_info(&self, kind: InfoKind) {
        let event = InfoEvent {
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst),
            kind,
        };
        debug!("Coordinator {}: {}", self.id, event);
        self.info.publish(event);
    }

    /// Registers the channel, publishes it, and drops it from the registry once it closes.
    fn adopt_channel(self: &Arc<Self>, channel: ChannelAdapter) {
        let id = channel.id();
        self.channels.insert(id, channel.clone());

        let registry: Weak<Self> = Arc::downgrade(self);
        let mut closed = channel.closed_state();
        tokio::spawn(async move {
            if closed.wait_for(|closed| *closed).await.is_err() {
                return;
            }
            if let Some(shared) = registry.upgrade() {
                shared.forget_channel(id);
            }
        });

        self.data_channels.publish(channel);
    }

    fn forget_channel(&self, id: ChannelId) {
        if self.channels.remove(&id).is_some() {
            debug!("DataChannel {} dropped from registry of {}", id, self.id);
        }
    }

    fn begin(&self, role: Role) -> Result<(), NegotiationFault> {
        let mut current = HandshakePhase::Idle;
        let started = self.phase.send_if_modified(|phase| {
            if phase.is_idle() {
                *phase = HandshakePhase::Negotiating(role);
                true
            } else {
                current = *phase;
                false
            }
        });

        if started {
            debug!("Coordinator {} negotiating as {:?}", self.id, role);
            Ok(())
        } else {
            Err(NegotiationFault::NotIdle(current))
        }
    }

    fn advance(&self, phase: HandshakePhase) {
        debug!("Coordinator {} -> {}", self.id, phase);
        self.phase.send_replace(phase);
    }

    /// Publishes `error` and marks the handshake failed, abandoning its gathering round. A
    /// rejected start (`NotIdle`, or a description of the wrong kind) leaves any handshake
    /// already in progress untouched.
    fn fail(&self, role: Role, error: HandshakeError) -> HandshakeError {
        let rejected_start = matches!(
            error.fault(),
            Some(NegotiationFault::NotIdle(_) | NegotiationFault::UnexpectedDescription { .. })
        );
        if !rejected_start {
            let failed = self.phase.send_if_modified(|phase| match *phase {
                HandshakePhase::Negotiating(r) | HandshakePhase::AwaitingCandidates(r)
                    if r == role =>
                {
                    *phase = HandshakePhase::Failed(role);
                    true
                }
                _ => false,
            });
            if failed {
                self.gate.disarm();
            }
        }

        error!("Handshake failed on {}: {}", self.id, error);
        self.errors.publish(error.clone());
        error
    }

    async fn negotiate_offer(
        self: &Arc<Self>,
        label: &str,
        options: &ChannelOptions,
    ) -> Result<Offer> {
        self.begin(Role::Initiator)?;
        self.gate.arm();

        let raw = self
            .bounded("create channel", self.transport.create_channel(label, options))
            .await?;
        let channel = ChannelAdapter::wrap(raw).await;
        self.adopt_channel(channel.clone());

        match self.offer_for_channel().await {
            Ok(local_description) => Ok(Offer::new(local_description, channel, Arc::clone(self))),
            Err(e) => {
                // Nobody gets a handle on it through the failed offer.
                self.forget_channel(channel.id());
                Err(e)
            }
        }
    }

    async fn offer_for_channel(&self) -> Result<SessionDescription> {
        let offer = self.bounded("create offer", self.transport.create_offer()).await?;
        self.bounded(
            "set local description",
            self.transport.set_local_description(offer),
        )
        .await?;

        self.await_candidates(Role::Initiator).await
    }

    async fn negotiate_answer(&self, offer: SessionDescription) -> Result<Answer> {
        if !offer.is_offer() {
            return Err(NegotiationFault::UnexpectedDescription {
                expected: SdpKind::Offer,
                actual: offer.kind,
            }
            .into());
        }

        self.begin(Role::Responder)?;
        self.gate.arm();

        self.bounded(
            "set remote description",
            self.transport.set_remote_description(offer),
        )
        .await?;
        let answer = self.bounded("create answer", self.transport.create_answer()).await?;
        self.bounded(
            "set local description",
            self.transport.set_local_description(answer),
        )
        .await?;

        let local_description = self.await_candidates(Role::Responder).await?;
        Ok(Answer::new(local_description))
    }

    pub(crate) async fn apply_answer(
        &self,
        answer: SessionDescription,
    ) -> Result<(), HandshakeError> {
        info!("Applying remote answer on {}", self.id);

        self.set_remote_answer(answer).await.map_err(|e| {
            let error = HandshakeError::AnswerApplyFailed(e.into());
            error!("Handshake failed on {}: {}", self.id, error);
            self.errors.publish(error.clone());
            error
        })
    }

    async fn set_remote_answer(&self, answer: SessionDescription) -> Result<()> {
        if !answer.is_answer() {
            return Err(NegotiationFault::UnexpectedDescription {
                expected: SdpKind::Answer,
                actual: answer.kind,
            }
            .into());
        }

        self.bounded(
            "set remote description",
            self.transport.set_remote_description(answer),
        )
        .await
    }

    async fn await_candidates(&self, role: Role) -> Result<SessionDescription> {
        self.advance(HandshakePhase::AwaitingCandidates(role));
        self.gate.wait(self.config.gathering_timeout).await?;

        let local_description = self
            .bounded("read local description", async {
                self.transport
                    .local_description()
                    .await
                    .ok_or_else(|| NegotiationFault::MissingLocalDescription.into())
            })
            .await?;

        self.advance(HandshakePhase::Complete(role));
        info!(
            "Handshake on {} ready to hand off ({} description)",
            self.id, local_description.kind
        );
        Ok(local_description)
    }

    /// Runs one transport call under the configured operation timeout. The transport's own
    /// error is passed through untouched.
    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let Some(after) = self.config.operation_timeout else {
            return call.await;
        };

        match tokio::time::timeout(after, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!("{} timed out on {} after {:?}", operation, self.id, after);
                Err(NegotiationFault::OperationTimedOut { operation, after }.into())
            }
        }
    }
}
