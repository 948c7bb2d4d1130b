//! Integration tests for event translation through a connected gateway.

mod common;

use bridge_proto::{
    Command, Field, ForeignAction, ForeignEvent, HookKind, SpawnClient, SpawnServer,
};
use common::connected;
use slirc_bridge::Outcome;

fn chat(sender: &str, channel: &str, text: &str) -> ForeignEvent {
    ForeignEvent::Chat {
        sender: sender.into(),
        channel: channel.into(),
        text: text.into(),
    }
}

#[tokio::test]
async fn test_first_chat_spawns_and_joins_once() {
    let (gateway, transport, sink) = connected().await;

    transport.inject(chat("Bob", "#town", "hello")).await;
    let events = sink.wait_for(2).await;
    let mirror = gateway.mirror().expect("mirror");

    let bob = mirror.foreign_to_uid("bob").expect("Bob is mirrored");
    let user = mirror.user(&bob).expect("user");
    assert_eq!(user.nick, "Bob");
    assert!(mirror.channel("#town").expect("channel").users.contains(&bob));

    assert_eq!(sink.names(), vec!["JOIN", "PRIVMSG"]);
    assert!(events.iter().all(|e| e.source == bob && !e.relay));
    assert_eq!(
        events[1].kind,
        HookKind::Message {
            target: "#town".into(),
            text: "hello".into(),
        }
    );

    // A second line reuses the same user and does not rejoin.
    let before = mirror.stats();
    transport.inject(chat("Bob", "#town", "again")).await;
    let events = sink.wait_for(3).await;
    assert_eq!(mirror.stats(), before);
    assert_eq!(events[2].source, bob);
    assert_eq!(events[2].kind.name(), "PRIVMSG");
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_events_are_applied_in_arrival_order() {
    let (gateway, transport, sink) = connected().await;

    transport.inject(chat("Bob", "#town", "hi")).await;
    transport
        .inject(ForeignEvent::Rename {
            old: "Bob".into(),
            new: "Robert".into(),
        })
        .await;
    transport
        .inject(ForeignEvent::Leave {
            sender: "Robert".into(),
            channel: "#town".into(),
        })
        .await;
    transport
        .inject(ForeignEvent::Disconnect {
            sender: "Robert".into(),
            reason: "gone".into(),
        })
        .await;

    sink.wait_for(5).await;
    assert_eq!(sink.names(), vec!["JOIN", "PRIVMSG", "NICK", "PART", "QUIT"]);
    assert_eq!(gateway.stats().users, 1);
}

#[tokio::test]
async fn test_primary_speech_goes_to_the_wire() {
    let (gateway, transport, sink) = connected().await;
    let primary = gateway.primary().expect("primary");

    let outcome = gateway
        .command(Command::Message {
            source: primary,
            target: "#town".into(),
            text: "hello from the host".into(),
            notice: false,
        })
        .await
        .expect("send");

    assert_eq!(outcome, Outcome::Sent);
    assert_eq!(
        transport.sent(),
        vec![ForeignAction::Say {
            target: "#town".into(),
            text: "hello from the host".into(),
        }]
    );
    assert!(sink.events().is_empty());
}

#[tokio::test]
async fn test_virtual_client_speech_is_relayed() {
    let (gateway, transport, sink) = connected().await;

    let Outcome::Spawned(uid) = gateway
        .command(Command::SpawnClient(SpawnClient::new("Services")))
        .await
        .expect("spawn")
    else {
        panic!("expected a spawned client");
    };
    gateway
        .command(Command::Join {
            client: uid.clone(),
            channel: "#town".into(),
        })
        .await
        .expect("join");
    gateway
        .command(Command::Message {
            source: uid.clone(),
            target: "#town".into(),
            text: "relayed".into(),
            notice: true,
        })
        .await
        .expect("notice");

    assert!(transport.sent().is_empty());
    assert_eq!(sink.names(), vec!["RELAY_JOIN", "RELAY_NOTICE"]);
    assert!(sink.events().iter().all(|e| e.source == uid));
}

#[tokio::test]
async fn test_unsupported_commands_produce_no_traffic() {
    let (gateway, transport, sink) = connected().await;
    let primary = gateway.primary().expect("primary");
    let root = gateway.root().expect("root");
    let before = gateway.stats();

    let commands = vec![
        Command::Kick {
            source: primary.clone(),
            channel: "#town".into(),
            target: primary.clone(),
            reason: "x".into(),
        },
        Command::Topic {
            source: primary.clone(),
            channel: "#town".into(),
            text: "topic".into(),
        },
        Command::Kill {
            source: root.clone(),
            target: primary.clone(),
            reason: "x".into(),
        },
        Command::Away {
            source: primary.clone(),
            text: Some("brb".into()),
        },
        Command::Numeric {
            source: root.clone(),
            numeric: 401,
            target: primary.clone(),
            text: "No such nick".into(),
        },
        Command::Mode {
            source: primary.clone(),
            target: "#town".into(),
            modes: "+o Bob".into(),
        },
    ];

    for cmd in commands {
        let name = cmd.name();
        let outcome = gateway.command(cmd).await.expect("unsupported is not an error");
        assert!(matches!(outcome, Outcome::NoOp(_)), "{name} -> {outcome:?}");
    }

    assert!(transport.sent().is_empty());
    assert!(sink.events().is_empty());
    assert_eq!(gateway.stats(), before);
}

#[tokio::test]
async fn test_update_client_and_squit_through_gateway() {
    let (gateway, transport, sink) = connected().await;
    transport.inject(chat("Bob", "#town", "hi")).await;
    sink.wait_for(2).await;
    let mirror = gateway.mirror().expect("mirror");
    let bob = mirror.foreign_to_uid("bob").expect("Bob is mirrored");

    let outcome = gateway
        .command(Command::UpdateClient {
            target: bob.clone(),
            field: Field::Host,
            value: "bob.example".into(),
        })
        .await
        .expect("update foreign user");
    assert!(matches!(outcome, Outcome::Updated(_)));
    assert_eq!(mirror.user(&bob).expect("bob").host, "bob.example");

    let Outcome::ServerSpawned(sid) = gateway
        .command(Command::SpawnServer(SpawnServer {
            name: "replay.relay".into(),
            uplink: None,
            description: None,
            internal: true,
        }))
        .await
        .expect("spawn server")
    else {
        panic!("expected a spawned server");
    };

    let mut req = SpawnClient::new("Ghost");
    req.server = Some(sid.clone());
    req.manipulatable = true;
    let Outcome::Spawned(ghost) = gateway
        .command(Command::SpawnClient(req))
        .await
        .expect("spawn client")
    else {
        panic!("expected a spawned client");
    };

    // Host-spawned clients change silently.
    gateway
        .command(Command::UpdateClient {
            target: ghost.clone(),
            field: Field::Host,
            value: "ghost.example".into(),
        })
        .await
        .expect("update internal client");

    gateway
        .command(Command::Squit {
            source: gateway.root().expect("root"),
            target: sid,
            reason: "done".into(),
        })
        .await
        .expect("squit");

    assert_eq!(
        sink.names(),
        vec!["JOIN", "PRIVMSG", "CHGHOST", "RELAY_SQUIT"]
    );
    assert!(mirror.user(&ghost).is_none());
    assert!(mirror.user(&bob).is_some());
    assert_eq!(mirror.stats().servers, 1);
}
