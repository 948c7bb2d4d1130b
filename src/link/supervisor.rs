//! The connection supervisor.
//!
//! A [`Gateway`] owns one foreign link at a time. Each successful
//! `connect()` builds a fresh mirror, root server and primary identity, and
//! spawns two tasks:
//! - the event pump, the only consumer of inbound foreign events
//! - the liveness waiter, which tears the link down when the latch is set
//!
//! Teardown runs at most once per connection however many callers race
//! for it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use bridge_proto::{Command, ForeignEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, warn};

use super::latch::AbortLatch;
use super::split::{self, TeardownCause};
use super::state::{LinkState, StateCell};
use crate::config::Config;
use crate::error::{ConnectError, GatewayError, GatewayResult};
use crate::hooks::HookSink;
use crate::state::{EntityMirror, MirrorStats, Sid, SplitSnapshot, Uid, UserParams};
use crate::telemetry::{EventTimer, spans};
use crate::transport::Transport;
use crate::translate::{Outcome, PROTOCOL_CAPS, Translator};

/// Inbound events buffered between the transport and the pump.
const EVENT_CAPACITY: usize = 1024;

/// Per-connection state.
struct Session {
    generation: u64,
    translator: Arc<Translator>,
    pump: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

struct Inner {
    config: Config,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn HookSink>,
    state: StateCell,
    latch: AbortLatch,
    /// Serializes connect and teardown.
    lifecycle: tokio::sync::Mutex<()>,
    session: parking_lot::RwLock<Option<Arc<Session>>>,
    generation: AtomicU64,
}

/// Protocol-bridging gateway for one foreign network.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<Inner>,
}

impl Gateway {
    pub fn new(config: Config, transport: Arc<dyn Transport>, sink: Arc<dyn HookSink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                transport,
                sink,
                state: StateCell::default(),
                latch: AbortLatch::new(),
                lifecycle: tokio::sync::Mutex::new(()),
                session: parking_lot::RwLock::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn state(&self) -> LinkState {
        self.inner.state.get()
    }

    /// The latch raised when the link drops or is stopped.
    pub fn latch(&self) -> AbortLatch {
        self.inner.latch.clone()
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Protocol capabilities advertised to the host.
    pub fn protocol_caps(&self) -> &'static [&'static str] {
        PROTOCOL_CAPS
    }

    /// Case mapping the mirror folds nicks and channels with.
    pub fn casemapping(&self) -> &'static str {
        self.inner.config.translate.casemapping.as_str()
    }

    /// Mirror of the current connection.
    pub fn mirror(&self) -> Option<Arc<EntityMirror>> {
        self.session().map(|s| s.translator.mirror().clone())
    }

    pub fn stats(&self) -> MirrorStats {
        self.mirror().map(|m| m.stats()).unwrap_or_default()
    }

    /// Root server of the current connection.
    pub fn root(&self) -> Option<Sid> {
        self.session().map(|s| s.translator.root().to_string())
    }

    /// The gateway's own user on the current connection.
    pub fn primary(&self) -> Option<Uid> {
        self.session().map(|s| s.translator.primary().to_string())
    }

    fn session(&self) -> Option<Arc<Session>> {
        self.inner.session.read().clone()
    }

    /// Establish the foreign link.
    ///
    /// Only valid from `Disconnected`. On failure the gateway is back in
    /// `Disconnected` with nothing mirrored; it never retries on its own.
    pub async fn connect(&self) -> Result<(), ConnectError> {
        let _lifecycle = self.inner.lifecycle.lock().await;
        if !self
            .inner
            .state
            .transition(LinkState::Disconnected, LinkState::Connecting)
        {
            return Err(ConnectError::InvalidState(self.inner.state.get()));
        }

        let config = &self.inner.config;
        let span = spans::link(&config.server.name, &config.link.address());
        match self.establish().instrument(span).await {
            Ok(session) => {
                *self.inner.session.write() = Some(session);
                self.inner.state.set(LinkState::Connected);
                info!(network = %config.server.name, "Link established");
                Ok(())
            }
            Err(e) => {
                self.inner.state.set(LinkState::Disconnected);
                warn!(error = %e, code = e.error_code(), "Connect failed");
                Err(e)
            }
        }
    }

    async fn establish(&self) -> Result<Arc<Session>, ConnectError> {
        let inner = &self.inner;
        let config = &inner.config;

        let mirror = Arc::new(EntityMirror::new(config.translate.casemapping));
        let root = mirror.create_server(
            &config.server.hostname,
            None,
            true,
            config.server.description.clone(),
        )?;
        let mut params = UserParams::host(
            config.link.ingamename.clone(),
            config.translate.default_ident.clone(),
            config.server.hostname.clone(),
        );
        params.realname = config.server.name.clone();
        let primary = match mirror.create_user(&root, params) {
            Ok(uid) => uid,
            Err(e) => {
                let _ = mirror.remove_server(&root);
                return Err(e.into());
            }
        };
        debug!(root = %root, primary = %primary, "Local entities registered");

        let (tx, rx) = mpsc::channel::<ForeignEvent>(EVENT_CAPACITY);
        inner.latch.clear();
        let timeout = config.link.connect_timeout();
        let started =
            tokio::time::timeout(timeout, inner.transport.start(tx, inner.latch.clone())).await;
        let failure = match started {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(ConnectError::Transport(e)),
            Err(_) => {
                inner.transport.stop().await;
                Some(ConnectError::Timeout(timeout))
            }
        };
        if let Some(e) = failure {
            let _ = mirror.remove_server(&root);
            return Err(e);
        }

        let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let translator = Arc::new(Translator::new(
            mirror,
            config.translate.clone(),
            root,
            primary,
        ));

        let pump = tokio::spawn(
            run_pump(translator.clone(), inner.sink.clone(), rx)
                .instrument(tracing::Span::current()),
        );
        tokio::spawn(
            run_waiter(Arc::downgrade(inner), inner.latch.clone(), generation)
                .instrument(tracing::Span::current()),
        );

        Ok(Arc::new(Session {
            generation,
            translator,
            pump: parking_lot::Mutex::new(Some(pump)),
        }))
    }

    /// Stop the link, cascading every mirrored entity away.
    ///
    /// Returns what was removed, or `None` if the link was already down.
    pub async fn stop(&self) -> Option<SplitSnapshot> {
        let split = teardown(&self.inner, TeardownCause::Stop, None).await;
        self.inner.latch.set();
        split
    }

    /// Run one canonical command against the link.
    pub async fn command(&self, cmd: Command) -> GatewayResult<Outcome> {
        let session = self.session().ok_or(GatewayError::NotConnected)?;
        let span = spans::outbound(cmd.name(), command_source(&cmd));
        async {
            let out = session.translator.translate_outbound(cmd)?;
            if let Some(action) = out.action {
                self.inner.transport.send(action).await?;
            }
            for hook in out.hooks {
                self.inner.sink.emit(hook);
            }
            Ok::<_, GatewayError>(out.outcome)
        }
        .instrument(span)
        .await
    }
}

async fn teardown(
    inner: &Inner,
    cause: TeardownCause,
    generation: Option<u64>,
) -> Option<SplitSnapshot> {
    let _lifecycle = inner.lifecycle.lock().await;

    let session = inner.session.read().clone()?;
    if generation.is_some_and(|g| g != session.generation) {
        return None;
    }
    if !inner
        .state
        .transition(LinkState::Connected, LinkState::Disconnected)
    {
        return None;
    }
    inner.session.write().take();
    info!(cause = ?cause, "Tearing down link");

    inner.transport.stop().await;

    let pump = session.pump.lock().take();
    if let Some(mut pump) = pump {
        let drain = inner.config.link.drain_timeout();
        if tokio::time::timeout(drain, &mut pump).await.is_err() {
            warn!(timeout = ?drain, "Event pump did not drain in time, aborting it");
            pump.abort();
        }
    }

    Some(split::cascade(&session.translator, inner.sink.as_ref(), cause))
}

/// Apply inbound events in order until the transport drops its sender.
async fn run_pump(
    translator: Arc<Translator>,
    sink: Arc<dyn HookSink>,
    mut rx: mpsc::Receiver<ForeignEvent>,
) {
    while let Some(event) = rx.recv().await {
        let name = event.name();
        let _timer = EventTimer::new(name);
        let _span = spans::inbound(name).entered();
        for hook in translator.translate_inbound(event) {
            sink.emit(hook);
        }
    }
    debug!("Event pump finished");
}

/// Wait for the latch, then tear down the connection it belongs to.
async fn run_waiter(inner: Weak<Inner>, latch: AbortLatch, generation: u64) {
    latch.wait().await;
    let Some(inner) = inner.upgrade() else {
        return;
    };
    if teardown(&inner, TeardownCause::Aborted, Some(generation)).await.is_some() {
        warn!("Foreign link lost");
    }
}

fn command_source(cmd: &Command) -> Option<&str> {
    match cmd {
        Command::Message { source, .. }
        | Command::Part { source, .. }
        | Command::Quit { source, .. }
        | Command::Squit { source, .. } => Some(source),
        Command::Join { client, .. } => Some(client),
        Command::Sjoin { server, .. } => Some(server),
        _ => None,
    }
}
