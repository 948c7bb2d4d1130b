//! Integration tests for chat log replay.

mod common;

use std::io::Write;

use bridge_proto::{ForeignAction, ForeignEvent, HookKind};
use common::connected;
use slirc_bridge::replay::{ReplayError, ReplaySummary, replay};

fn write_log(dir: &tempfile::TempDir, name: &str, lines: &[&str]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create log");
    for line in lines {
        writeln!(file, "{line}").expect("write log");
    }
    path
}

#[tokio::test]
async fn test_replay_spawns_speaks_and_cleans_up() {
    let (gateway, transport, sink) = connected().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let log = write_log(
        &dir,
        "town.log",
        &[
            "[00:00:01] <Alice> hello",
            "[00:00:02] * Bob waves",
            "[00:00:03] *** Joins: Carol (carol@host)",
            "[00:00:04] <alice> again",
        ],
    );
    let config = gateway.config().replay.clone();

    let summary = replay(&gateway, "#town", std::slice::from_ref(&log), &config)
        .await
        .expect("replay");
    assert_eq!(
        summary,
        ReplaySummary {
            files: 1,
            lines: 3,
            users: 2,
        }
    );

    assert_eq!(
        sink.names(),
        vec![
            "RELAY_JOIN",
            "RELAY_PRIVMSG",
            "RELAY_JOIN",
            "RELAY_PRIVMSG",
            "RELAY_PRIVMSG",
            "RELAY_SQUIT",
        ]
    );
    let events = sink.events();
    assert_eq!(
        events[3].kind,
        HookKind::Message {
            target: "#town".into(),
            text: "\x01ACTION waves\x01".into(),
        }
    );
    let HookKind::ServerQuit { users, .. } = &events[5].kind else {
        panic!("expected the replay server to split last");
    };
    assert_eq!(users.len(), 2);

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert!(matches!(
        &sent[0],
        ForeignAction::Notice { target, text }
            if target == "#town" && text.starts_with("Beginning replay of log file")
    ));
    assert_eq!(
        sent[1],
        ForeignAction::Notice {
            target: "#town".into(),
            text: "Finished replay of 1 items".into(),
        }
    );

    assert_eq!(gateway.stats().users, 1);
    assert_eq!(gateway.stats().servers, 1);
}

#[tokio::test]
async fn test_replay_suffixes_nicks_already_present() {
    let (gateway, transport, sink) = connected().await;
    transport
        .inject(ForeignEvent::Chat {
            sender: "Bob".into(),
            channel: "#town".into(),
            text: "live".into(),
        })
        .await;
    sink.wait_for(2).await;

    let dir = tempfile::tempdir().expect("tempdir");
    let log = write_log(&dir, "a.log", &["[10:00:00] <Bob> from the past"]);
    let config = gateway.config().replay.clone();
    let mirror = gateway.mirror().expect("mirror");

    let replayed = tokio::spawn({
        let gateway = gateway.clone();
        async move { replay(&gateway, "#town", &[log], &config).await }
    });
    let summary = replayed.await.expect("join").expect("replay");
    assert_eq!(summary.users, 1);

    let quit = sink
        .events()
        .into_iter()
        .find_map(|e| match e.kind {
            HookKind::ServerQuit { users, .. } => Some(users),
            _ => None,
        })
        .expect("replay server split");
    assert_eq!(quit.len(), 1);
    assert_eq!(quit[0].1, "Bob|mimic");
    assert!(mirror.foreign_to_uid("bob").is_some(), "live Bob is untouched");
}

#[tokio::test]
async fn test_replay_rejects_bad_channel() {
    let (gateway, transport, _sink) = connected().await;
    let config = gateway.config().replay.clone();

    let err = replay(&gateway, "town", &[], &config)
        .await
        .expect_err("bad channel");
    assert!(matches!(err, ReplayError::InvalidChannel(_)));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_replay_missing_file_still_removes_server() {
    let (gateway, _transport, _sink) = connected().await;
    let config = gateway.config().replay.clone();
    let missing = std::path::PathBuf::from("/nonexistent/slirc-bridge/replay.log");

    let err = replay(&gateway, "#town", &[missing], &config)
        .await
        .expect_err("missing log");
    assert_eq!(err.error_code(), "io");
    assert_eq!(gateway.stats().servers, 1);
}
