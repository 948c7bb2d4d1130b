//! Integration tests for the TCP line transport against a fake foreign server.

mod common;

use std::sync::Arc;

use bridge_proto::{Command, HookKind, line::MAX_LINE_LEN};
use common::{FakeServer, RecordingSink, eventually, recv, test_config};
use futures_util::SinkExt;
use tokio::io::AsyncWriteExt;
use slirc_bridge::transport::LineTransport;
use slirc_bridge::{ConnectError, Gateway, LinkState, TransportError};

fn gateway_for(server: &FakeServer, pass: Option<&str>) -> (Gateway, Arc<RecordingSink>) {
    let mut config = test_config();
    config.link.port = server.port();
    config.link.sendpass = pass.map(str::to_string);
    let sink = RecordingSink::new();
    let transport = Arc::new(LineTransport::new(config.link.clone()));
    (Gateway::new(config, transport, sink.clone()), sink)
}

#[tokio::test]
async fn test_handshake_and_keepalive() {
    let server = FakeServer::bind().await;
    let (gateway, _sink) = gateway_for(&server, Some("hunter2"));

    let (connected, (mut peer, login)) =
        tokio::join!(gateway.connect(), server.accept_and_welcome());
    connected.expect("connect");
    assert_eq!(login, vec!["PASS :hunter2", "HELLO PyLink"]);
    assert_eq!(gateway.state(), LinkState::Connected);

    peer.send("PING 42".to_string()).await.expect("ping");
    assert_eq!(recv(&mut peer).await, "PONG 42");

    gateway.stop().await;
}

#[tokio::test]
async fn test_denied_handshake_fails_connect() {
    let server = FakeServer::bind().await;
    let (gateway, sink) = gateway_for(&server, None);

    let deny = async {
        let mut peer = server.accept().await;
        assert_eq!(recv(&mut peer).await, "HELLO PyLink");
        peer.send("DENIED :bad password".to_string())
            .await
            .expect("deny");
        peer
    };
    let (connected, _peer) = tokio::join!(gateway.connect(), deny);

    let err = connected.expect_err("denied");
    assert!(matches!(
        err,
        ConnectError::Transport(TransportError::Rejected(ref r)) if r == "bad password"
    ));
    assert_eq!(gateway.state(), LinkState::Disconnected);
    assert!(sink.events().is_empty());
}

#[tokio::test]
async fn test_events_and_speech_cross_the_wire() {
    let server = FakeServer::bind().await;
    let (gateway, sink) = gateway_for(&server, None);
    let (connected, (mut peer, _)) = tokio::join!(gateway.connect(), server.accept_and_welcome());
    connected.expect("connect");

    // Garbage is dropped without disturbing the link.
    peer.send("FROB x".to_string()).await.expect("garbage");
    peer.send("CHAT Bob #town :hello there".to_string())
        .await
        .expect("chat");
    sink.wait_for(2).await;
    assert_eq!(sink.names(), vec!["JOIN", "PRIVMSG"]);

    let primary = gateway.primary().expect("primary");
    gateway
        .command(Command::Message {
            source: primary,
            target: "#town".into(),
            text: "hi Bob".into(),
            notice: false,
        })
        .await
        .expect("say");
    assert_eq!(recv(&mut peer).await, "SAY #town :hi Bob");

    gateway.stop().await;
}

#[tokio::test]
async fn test_remote_close_tears_the_link_down() {
    let server = FakeServer::bind().await;
    let (gateway, sink) = gateway_for(&server, None);
    let (connected, (mut peer, _)) = tokio::join!(gateway.connect(), server.accept_and_welcome());
    connected.expect("connect");

    peer.send("JOIN Bob #town".to_string()).await.expect("join");
    sink.wait_for(1).await;
    drop(peer);

    eventually("teardown after remote close", || {
        gateway.state() == LinkState::Disconnected
    })
    .await;
    sink.wait_for(3).await;
    assert_eq!(sink.names(), vec!["JOIN", "QUIT", "SQUIT"]);
    assert!(gateway.mirror().is_none());
}

#[tokio::test]
async fn test_overlong_line_is_dropped_and_the_link_survives() {
    let server = FakeServer::bind().await;
    let (gateway, sink) = gateway_for(&server, None);
    let (connected, (mut peer, _)) = tokio::join!(gateway.connect(), server.accept_and_welcome());
    connected.expect("connect");

    let flood = format!("CHAT Bob #town :{}", "x".repeat(MAX_LINE_LEN + 904));
    peer.send(flood).await.expect("overlong");
    peer.send("CHAT Alice #town :hi".to_string())
        .await
        .expect("chat");

    sink.wait_for(2).await;
    assert_eq!(sink.names(), vec!["JOIN", "PRIVMSG"]);
    assert_eq!(gateway.state(), LinkState::Connected);
    let mirror = gateway.mirror().expect("mirror");
    assert!(mirror.foreign_to_uid("bob").is_none());
    assert!(mirror.foreign_to_uid("alice").is_some());

    gateway.stop().await;
}

#[tokio::test]
async fn test_invalid_utf8_is_decoded_lossily() {
    let server = FakeServer::bind().await;
    let (gateway, sink) = gateway_for(&server, None);
    let (connected, (mut peer, _)) = tokio::join!(gateway.connect(), server.accept_and_welcome());
    connected.expect("connect");

    let raw = peer.get_mut();
    raw.write_all(b"CHAT Bob #town :\xff\xfe\n").await.expect("raw bytes");
    raw.flush().await.expect("flush");
    peer.send("CHAT Alice #town :hi".to_string())
        .await
        .expect("chat");

    let events = sink.wait_for(4).await;
    assert_eq!(sink.names(), vec!["JOIN", "PRIVMSG", "JOIN", "PRIVMSG"]);
    assert_eq!(
        events[1].kind,
        HookKind::Message {
            target: "#town".into(),
            text: "\u{fffd}\u{fffd}".into(),
        }
    );
    assert_eq!(gateway.state(), LinkState::Connected);

    gateway.stop().await;
}
