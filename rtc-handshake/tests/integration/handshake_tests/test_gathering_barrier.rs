use rtc_handshake::{
    CoordinatorConfig, HandshakePhase, InfoKind, NegotiationFault, Role, SdpKind,
    SessionDescription,
};
use std::time::Duration;

use crate::integration::init_tracing;
use crate::utils::{
    MOCK_ANSWER_SDP, MOCK_OFFER_SDP, MockScript, mock_coordinator, mock_coordinator_with_config,
};

#[tokio::test]
async fn test_initiate_waits_for_gathering_terminator() {
    init_tracing();

    let (coordinator, transport) = mock_coordinator(MockScript::default());
    let mut info = coordinator.info();

    let handshake = tokio::spawn(async move {
        let result = coordinator.initiate("chat", None).await;
        (coordinator, result)
    });

    let local = transport.wait_for_local_description().await;
    assert_eq!(local.kind, SdpKind::Offer);

    transport.emit_candidate("candidate:1 1 udp 1 10.0.0.1 5000 typ host").await;
    transport.emit_candidate("candidate:2 1 udp 1 10.0.0.2 5000 typ host").await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(
        !handshake.is_finished(),
        "initiate must not resolve before gathering completes"
    );

    transport.finish_gathering().await;
    let (coordinator, result) = tokio::time::timeout(Duration::from_secs(5), handshake)
        .await
        .expect("initiate did not resolve after gathering completed")
        .expect("task panicked");

    let offer = result.expect("initiate failed");
    assert_eq!(offer.local_description().kind, SdpKind::Offer);
    assert!(!offer.local_description().sdp.is_empty());
    assert_eq!(coordinator.gathering_completions(), 1);
    assert_eq!(coordinator.phase(), HandshakePhase::Complete(Role::Initiator));

    let kinds: Vec<InfoKind> = info.drain().into_iter().map(|e| e.kind).collect();
    assert!(matches!(kinds[0], InfoKind::NewCandidateDiscovered { .. }));
    assert!(matches!(kinds[1], InfoKind::NewCandidateDiscovered { .. }));
    assert_eq!(kinds[2], InfoKind::AllCandidatesDiscovered);
    assert_eq!(kinds.len(), 3);
}

#[tokio::test]
async fn test_info_sequence_is_strictly_increasing() {
    init_tracing();

    let (coordinator, _transport) =
        mock_coordinator(MockScript::gathering(&["candidate:a", "candidate:b", "candidate:c"]));
    let mut info = coordinator.info();

    coordinator
        .initiate("chat", None)
        .await
        .expect("initiate failed");

    let events = info.drain();
    assert_eq!(events.len(), 4);
    assert!(events.windows(2).all(|w| w[0].sequence < w[1].sequence));
    assert_eq!(events[3].kind, InfoKind::AllCandidatesDiscovered);
}

#[tokio::test]
async fn test_repeated_terminator_fires_gate_once() {
    init_tracing();

    let (coordinator, transport) = mock_coordinator(MockScript::gathering(&[]));

    coordinator
        .initiate("chat", None)
        .await
        .expect("initiate failed");
    transport.finish_gathering().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(coordinator.gathering_completions(), 1);
}

#[tokio::test]
async fn test_gathering_timeout_fails_initiate() {
    init_tracing();

    let config = CoordinatorConfig {
        gathering_timeout: Some(Duration::from_millis(100)),
        ..CoordinatorConfig::host_only()
    };
    let (coordinator, _transport) = mock_coordinator_with_config(MockScript::default(), config);
    let mut errors = coordinator.errors();

    let err = coordinator.initiate("chat", None).await.unwrap_err();

    assert!(matches!(
        err.fault(),
        Some(NegotiationFault::GatheringTimedOut(d)) if *d == Duration::from_millis(100)
    ));
    assert_eq!(coordinator.phase(), HandshakePhase::Failed(Role::Initiator));
    assert!(errors.try_recv().is_some());
}

#[tokio::test]
async fn test_terminator_after_timeout_is_not_counted() {
    init_tracing();

    let config = CoordinatorConfig {
        gathering_timeout: Some(Duration::from_millis(100)),
        ..CoordinatorConfig::host_only()
    };
    let (coordinator, transport) = mock_coordinator_with_config(MockScript::default(), config);

    coordinator.initiate("chat", None).await.unwrap_err();
    transport.finish_gathering().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(coordinator.gathering_completions(), 0);
    assert_eq!(coordinator.phase(), HandshakePhase::Failed(Role::Initiator));
}

#[tokio::test]
async fn test_rejected_join_keeps_running_round() {
    init_tracing();

    let (coordinator, transport) = mock_coordinator(MockScript::default());
    let coordinator = std::sync::Arc::new(coordinator);

    let handshake = tokio::spawn({
        let coordinator = coordinator.clone();
        async move { coordinator.join(SessionDescription::offer(MOCK_OFFER_SDP)).await }
    });
    let mut phase = coordinator.phase_changes();
    tokio::time::timeout(
        Duration::from_secs(5),
        phase.wait_for(|p| *p == HandshakePhase::AwaitingCandidates(Role::Responder)),
    )
    .await
    .expect("join never reached candidate gathering")
    .expect("coordinator dropped");

    let err = coordinator
        .join(SessionDescription::answer(MOCK_ANSWER_SDP))
        .await
        .unwrap_err();
    assert!(matches!(
        err.fault(),
        Some(NegotiationFault::UnexpectedDescription { .. })
    ));
    assert_eq!(
        coordinator.phase(),
        HandshakePhase::AwaitingCandidates(Role::Responder)
    );

    transport.finish_gathering().await;
    let answer = tokio::time::timeout(Duration::from_secs(5), handshake)
        .await
        .expect("join did not resolve after gathering completed")
        .expect("task panicked")
        .expect("join failed");

    assert_eq!(answer.local_description().kind, SdpKind::Answer);
    assert_eq!(coordinator.gathering_completions(), 1);
}
