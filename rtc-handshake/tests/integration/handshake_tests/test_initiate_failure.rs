use rtc_handshake::{HandshakeError, HandshakePhase, NegotiationFault, Role};

use crate::integration::init_tracing;
use crate::utils::{MockScript, mock_coordinator};

#[tokio::test]
async fn test_offer_failure_is_returned_and_published_once() {
    init_tracing();

    let (coordinator, transport) = mock_coordinator(MockScript {
        fail_create_offer: Some("offer exploded".to_owned()),
        ..MockScript::default()
    });
    let mut errors = coordinator.errors();

    let err = coordinator.initiate("chat", None).await.unwrap_err();

    let HandshakeError::InitiateFailed(cause) = &err else {
        panic!("expected InitiateFailed, got {:?}", err);
    };
    assert_eq!(cause.to_string(), "offer exploded");

    let published = errors.try_recv().expect("error was not published");
    let HandshakeError::InitiateFailed(published_cause) = &published else {
        panic!("expected InitiateFailed, got {:?}", published);
    };
    assert!(published_cause.ptr_eq(cause), "published cause must be the returned cause");
    assert!(errors.try_recv().is_none(), "exactly one error event expected");

    assert!(transport.local().is_none(), "no local description may be produced");
    assert_eq!(coordinator.phase(), HandshakePhase::Failed(Role::Initiator));
}

#[tokio::test]
async fn test_channel_is_published_before_negotiation() {
    init_tracing();

    let (coordinator, transport) = mock_coordinator(MockScript {
        fail_create_offer: Some("offer exploded".to_owned()),
        ..MockScript::default()
    });
    let mut channels = coordinator.data_channels();

    let _ = coordinator.initiate("chat", None).await;

    let channel = channels.try_recv().expect("channel should be published");
    assert_eq!(channel.label(), "chat");
    assert_eq!(transport.created_channels().len(), 1);
}

#[tokio::test]
async fn test_failed_initiate_drops_its_channel() {
    init_tracing();

    let (coordinator, _transport) = mock_coordinator(MockScript {
        fail_create_offer: Some("offer exploded".to_owned()),
        ..MockScript::default()
    });
    let mut channels = coordinator.data_channels();

    let _ = coordinator.initiate("chat", None).await;

    let channel = channels.try_recv().expect("channel should be published");
    assert!(coordinator.channel(channel.id()).is_none());
    assert!(coordinator.channels().is_empty());
}

#[tokio::test]
async fn test_failed_coordinator_rejects_retry() {
    init_tracing();

    let (coordinator, _transport) = mock_coordinator(MockScript {
        fail_create_offer: Some("offer exploded".to_owned()),
        ..MockScript::default()
    });
    let _ = coordinator.initiate("chat", None).await;
    let mut errors = coordinator.errors();

    let err = coordinator.initiate("chat", None).await.unwrap_err();

    assert!(matches!(
        err.fault(),
        Some(NegotiationFault::NotIdle(HandshakePhase::Failed(Role::Initiator)))
    ));
    assert!(errors.try_recv().is_some());
    assert_eq!(coordinator.phase(), HandshakePhase::Failed(Role::Initiator));
}

#[tokio::test]
async fn test_second_handshake_is_rejected() {
    init_tracing();

    let (coordinator, _transport) = mock_coordinator(MockScript::gathering(&["candidate:1"]));
    coordinator
        .initiate("chat", None)
        .await
        .expect("first initiate failed");

    let err = coordinator.initiate("chat-2", None).await.unwrap_err();

    assert!(matches!(err, HandshakeError::InitiateFailed(_)));
    assert!(matches!(
        err.fault(),
        Some(NegotiationFault::NotIdle(HandshakePhase::Complete(Role::Initiator)))
    ));
    assert_eq!(coordinator.phase(), HandshakePhase::Complete(Role::Initiator));
}
