use rtc_handshake::{
    HandshakeError, HandshakePhase, NegotiationFault, Role, SdpKind, SessionDescription,
};

use crate::integration::init_tracing;
use crate::utils::{MOCK_ANSWER_SDP, MOCK_OFFER_SDP, MockScript, mock_coordinator};

#[tokio::test]
async fn test_join_returns_complete_answer() {
    init_tracing();

    let (coordinator, transport) = mock_coordinator(MockScript::gathering(&["candidate:1"]));
    let offer = SessionDescription::offer(MOCK_OFFER_SDP);

    let answer = coordinator.join(offer.clone()).await.expect("join failed");

    assert_eq!(answer.local_description().kind, SdpKind::Answer);
    assert_eq!(answer.local_description().sdp, MOCK_ANSWER_SDP);
    assert_eq!(transport.remote(), Some(offer));
    assert_eq!(coordinator.gathering_completions(), 1);
    assert_eq!(coordinator.phase(), HandshakePhase::Complete(Role::Responder));
}

#[tokio::test]
async fn test_join_rejects_answer_description() {
    init_tracing();

    let (coordinator, transport) = mock_coordinator(MockScript::gathering(&[]));
    let mut errors = coordinator.errors();

    let err = coordinator
        .join(SessionDescription::answer(MOCK_ANSWER_SDP))
        .await
        .unwrap_err();

    assert!(matches!(err, HandshakeError::JoinFailed(_)));
    assert!(matches!(
        err.fault(),
        Some(NegotiationFault::UnexpectedDescription {
            expected: SdpKind::Offer,
            actual: SdpKind::Answer,
        })
    ));
    assert!(errors.try_recv().is_some());
    assert!(transport.remote().is_none());
    assert_eq!(coordinator.phase(), HandshakePhase::Idle);
}

#[tokio::test]
async fn test_join_failure_keeps_transport_cause() {
    init_tracing();

    let (coordinator, transport) = mock_coordinator(MockScript {
        fail_set_remote: Some("malformed offer".to_owned()),
        ..MockScript::default()
    });
    let mut errors = coordinator.errors();

    let err = coordinator
        .join(SessionDescription::offer(MOCK_OFFER_SDP))
        .await
        .unwrap_err();

    assert!(matches!(err, HandshakeError::JoinFailed(_)));
    assert_eq!(err.cause().to_string(), "malformed offer");
    assert!(err.fault().is_none());

    let published = errors.try_recv().expect("error was not published");
    assert!(published.cause().ptr_eq(err.cause()));
    assert!(transport.local().is_none());
    assert_eq!(coordinator.phase(), HandshakePhase::Failed(Role::Responder));
}

#[tokio::test]
async fn test_create_answer_failure() {
    init_tracing();

    let (coordinator, transport) = mock_coordinator(MockScript {
        fail_create_answer: Some("no codecs in common".to_owned()),
        ..MockScript::default()
    });

    let err = coordinator
        .join(SessionDescription::offer(MOCK_OFFER_SDP))
        .await
        .unwrap_err();

    assert!(matches!(err, HandshakeError::JoinFailed(_)));
    assert_eq!(err.cause().to_string(), "no codecs in common");
    assert!(transport.remote().is_some());
    assert!(transport.local().is_none());
}
