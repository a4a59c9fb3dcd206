use rtc_handshake::{HandshakePhase, Role};
use std::time::Duration;

use crate::integration::init_tracing;
use crate::utils::{MockScript, mock_coordinator};

#[tokio::test]
async fn test_coordinators_do_not_share_state() {
    init_tracing();

    let (first, first_transport) = mock_coordinator(MockScript::gathering(&["candidate:a"]));
    let (second, second_transport) = mock_coordinator(MockScript::default());
    let mut first_info = first.info();
    let mut second_info = second.info();
    let mut second_channels = second.data_channels();

    first.initiate("chat", None).await.expect("initiate failed");
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_ne!(first.id(), second.id());
    assert_eq!(first.phase(), HandshakePhase::Complete(Role::Initiator));
    assert_eq!(second.phase(), HandshakePhase::Idle);
    assert_eq!(first_info.drain().len(), 2);
    assert!(second_info.try_recv().is_none());
    assert!(second_channels.try_recv().is_none());
    assert_eq!(first_transport.created_channels().len(), 1);
    assert!(second_transport.created_channels().is_empty());
    assert_eq!(second.gathering_completions(), 0);
}

#[tokio::test]
async fn test_close_reaches_transport() {
    init_tracing();

    let (coordinator, transport) = mock_coordinator(MockScript::default());

    coordinator.close().await.expect("close failed");

    assert!(transport.is_closed());
}
