//! Integration test common infrastructure.
//!
//! Provides a scriptable in-memory transport, a recording hook sink, and a
//! fake foreign server speaking the line protocol over loopback TCP.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bridge_proto::{ForeignAction, ForeignEvent, HookEvent};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use slirc_bridge::config::Config;
use slirc_bridge::transport::Transport;
use slirc_bridge::{AbortLatch, Gateway, HookSink, TransportError};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_util::codec::{Framed, LinesCodec};

const WAIT: Duration = Duration::from_secs(2);

/// How [`MockTransport::start`] behaves.
#[derive(Debug, Clone)]
pub enum StartMode {
    Accept,
    Reject(String),
    Hang,
}

/// Transport that records what it is asked to send and lets the test
/// inject foreign events or drop the link.
pub struct MockTransport {
    mode: Mutex<StartMode>,
    events: Mutex<Option<mpsc::Sender<ForeignEvent>>>,
    latch: Mutex<Option<AbortLatch>>,
    sent: Mutex<Vec<ForeignAction>>,
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Self::with_mode(StartMode::Accept)
    }

    pub fn with_mode(mode: StartMode) -> Arc<Self> {
        Arc::new(Self {
            mode: Mutex::new(mode),
            events: Mutex::new(None),
            latch: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        })
    }

    pub fn set_mode(&self, mode: StartMode) {
        *self.mode.lock() = mode;
    }

    /// Deliver one event as if it came off the wire.
    pub async fn inject(&self, event: ForeignEvent) {
        let tx = self.events.lock().clone().expect("transport not started");
        tx.send(event).await.expect("event pump gone");
    }

    /// Simulate the remote end going away.
    pub fn drop_link(&self) {
        self.events.lock().take();
        if let Some(latch) = self.latch.lock().as_ref() {
            latch.set();
        }
    }

    pub fn sent(&self) -> Vec<ForeignAction> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn start(
        &self,
        events: mpsc::Sender<ForeignEvent>,
        latch: AbortLatch,
    ) -> Result<(), TransportError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        let mode = self.mode.lock().clone();
        match mode {
            StartMode::Accept => {}
            StartMode::Reject(reason) => return Err(TransportError::Rejected(reason)),
            StartMode::Hang => std::future::pending::<()>().await,
        }
        *self.events.lock() = Some(events);
        *self.latch.lock() = Some(latch);
        Ok(())
    }

    async fn send(&self, action: ForeignAction) -> Result<(), TransportError> {
        if self.events.lock().is_none() {
            return Err(TransportError::NotStarted);
        }
        self.sent.lock().push(action);
        Ok(())
    }

    async fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.events.lock().take();
        self.latch.lock().take();
    }
}

/// Sink that keeps every hook it is given.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<HookEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<HookEvent> {
        self.events.lock().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.events.lock().iter().map(HookEvent::hook_name).collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Wait until at least `n` events were recorded.
    pub async fn wait_for(&self, n: usize) -> Vec<HookEvent> {
        let waited = tokio::time::timeout(WAIT, async {
            while self.events.lock().len() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        let events = self.events();
        assert!(
            waited.is_ok(),
            "expected {n} hook events, got {}: {:?}",
            events.len(),
            events
        );
        events
    }
}

impl HookSink for RecordingSink {
    fn emit(&self, event: HookEvent) {
        self.events.lock().push(event);
    }
}

/// Test configuration with short timeouts.
pub fn test_config() -> Config {
    let mut config = Config::for_link("127.0.0.1");
    config.link.ingamename = "PyLink".to_string();
    config.link.connect_timeout_secs = 1;
    config.link.drain_timeout_ms = 200;
    config.replay.line_delay_ms = 0;
    config
}

/// A connected gateway over a [`MockTransport`].
pub async fn connected() -> (Gateway, Arc<MockTransport>, Arc<RecordingSink>) {
    let transport = MockTransport::new();
    let sink = RecordingSink::new();
    let gateway = Gateway::new(test_config(), transport.clone(), sink.clone());
    gateway.connect().await.expect("connect");
    (gateway, transport, sink)
}

/// Poll until `cond` holds or fail the test.
pub async fn eventually(what: &str, mut cond: impl FnMut() -> bool) {
    let waited = tokio::time::timeout(WAIT, async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "timed out waiting for {what}");
}

/// A foreign server on loopback that accepts one gateway at a time.
pub struct FakeServer {
    listener: TcpListener,
}

pub type Peer = Framed<TcpStream, LinesCodec>;

impl FakeServer {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        Self { listener }
    }

    pub fn port(&self) -> u16 {
        self.listener.local_addr().expect("local addr").port()
    }

    pub async fn accept(&self) -> Peer {
        let (stream, _) = self.listener.accept().await.expect("accept");
        Framed::new(stream, LinesCodec::new())
    }

    /// Accept a gateway, read its login lines and welcome it.
    pub async fn accept_and_welcome(&self) -> (Peer, Vec<String>) {
        let mut peer = self.accept().await;
        let mut login = Vec::new();
        loop {
            let line = recv(&mut peer).await;
            let hello = line.starts_with("HELLO ");
            login.push(line);
            if hello {
                break;
            }
        }
        peer.send("WELCOME".to_string()).await.expect("send WELCOME");
        (peer, login)
    }
}

/// Next line from the gateway.
pub async fn recv(peer: &mut Peer) -> String {
    tokio::time::timeout(WAIT, peer.next())
        .await
        .expect("timed out waiting for a line")
        .expect("connection closed")
        .expect("bad line")
}
