use rtc_handshake::ChannelAdapter;

use crate::integration::{init_tracing, next_within};
use crate::utils::MockChannel;

#[tokio::test]
async fn test_messages_are_not_replayed() {
    init_tracing();

    let raw = MockChannel::new("chat");
    let adapter = ChannelAdapter::wrap(raw.clone()).await;
    raw.fire_open();

    raw.fire_message("before");
    let mut messages = adapter.messages();
    assert!(messages.try_recv().is_none(), "earlier message must not be replayed");

    raw.fire_message("after");
    let msg = next_within(&mut messages, 1000).await;
    assert_eq!(msg.as_text(), Some("after"));
    assert!(messages.try_recv().is_none());
}

#[tokio::test]
async fn test_errors_are_not_replayed() {
    init_tracing();

    let raw = MockChannel::new("chat");
    let adapter = ChannelAdapter::wrap(raw.clone()).await;

    raw.fire_error("sctp abort");
    let mut errors = adapter.errors();
    assert!(errors.try_recv().is_none());

    raw.fire_error("sctp reset");
    let cause = next_within(&mut errors, 1000).await;
    assert_eq!(cause.to_string(), "sctp reset");
}

#[tokio::test]
async fn test_buffer_low_reaches_every_subscriber() {
    init_tracing();

    let raw = MockChannel::new("chat");
    let adapter = ChannelAdapter::wrap(raw.clone()).await;
    let mut first = adapter.send_buffer_low();
    let mut second = adapter.send_buffer_low();

    raw.fire_buffer_low();

    next_within(&mut first, 1000).await;
    next_within(&mut second, 1000).await;
}

#[tokio::test]
async fn test_messages_keep_emission_order() {
    init_tracing();

    let raw = MockChannel::new("chat");
    let adapter = ChannelAdapter::wrap(raw.clone()).await;
    let mut messages = adapter.messages();

    for text in ["one", "two", "three"] {
        raw.fire_message(text);
    }

    let received: Vec<String> = messages
        .drain()
        .iter()
        .filter_map(|m| m.as_text().map(str::to_owned))
        .collect();
    assert_eq!(received, vec!["one", "two", "three"]);
}
