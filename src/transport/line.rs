//! Newline-delimited text transport over TCP.

use async_trait::async_trait;
use bridge_proto::{ClientLine, ForeignAction, ForeignEvent, ServerLine, line::MAX_LINE_LEN};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

use super::Transport;
use super::codec::{ForeignLineCodec, RawLine};
use crate::config::LinkConfig;
use crate::error::TransportError;
use crate::link::AbortLatch;

/// Outgoing lines buffered per connection.
const OUTGOING_CAPACITY: usize = 256;

struct Session {
    outgoing: mpsc::Sender<String>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

/// Speaks the foreign line protocol to `link.ip:link.port`.
pub struct LineTransport {
    link: LinkConfig,
    session: Mutex<Option<Session>>,
}

impl LineTransport {
    pub fn new(link: LinkConfig) -> Self {
        Self {
            link,
            session: Mutex::new(None),
        }
    }

    async fn handshake(
        &self,
        framed: &mut Framed<TcpStream, ForeignLineCodec>,
    ) -> Result<(), TransportError> {
        if let Some(secret) = &self.link.sendpass {
            framed.send(ClientLine::Pass(secret.clone()).encode()?).await?;
        }
        framed
            .send(ClientLine::Hello(self.link.ingamename.clone()).encode()?)
            .await?;

        loop {
            let line = match framed.next().await {
                Some(Ok(RawLine::Text(line))) => line,
                Some(Ok(RawLine::Overlong(len))) => {
                    debug!(len, "Ignoring over-long handshake line");
                    continue;
                }
                Some(Err(e)) => return Err(e.into()),
                None => return Err(TransportError::ClosedDuringHandshake),
            };
            match line.parse::<ServerLine>() {
                Ok(ServerLine::Welcome) => return Ok(()),
                Ok(ServerLine::Denied(reason)) => return Err(TransportError::Rejected(reason)),
                Ok(ServerLine::Ping(token)) => {
                    framed.send(ClientLine::Pong(token).encode()?).await?;
                }
                Ok(ServerLine::Event(ev)) => {
                    debug!(event = ev.name(), "Ignoring event before WELCOME");
                }
                Err(e) => debug!(line = %line, error = %e, "Ignoring unparsable handshake line"),
            }
        }
    }
}

#[async_trait]
impl Transport for LineTransport {
    async fn start(
        &self,
        events: mpsc::Sender<ForeignEvent>,
        latch: AbortLatch,
    ) -> Result<(), TransportError> {
        let address = self.link.address();
        info!(address = %address, name = %self.link.ingamename, "Connecting to foreign server");

        let stream = TcpStream::connect(&address).await?;
        let mut framed = Framed::new(stream, ForeignLineCodec::new(MAX_LINE_LEN));
        self.handshake(&mut framed).await?;
        info!(address = %address, "Foreign handshake complete");

        let (mut sink, mut stream) = framed.split();
        let (out_tx, mut out_rx) = mpsc::channel::<String>(OUTGOING_CAPACITY);

        let writer_latch = latch.clone();
        let writer = tokio::spawn(async move {
            while let Some(line) = out_rx.recv().await {
                if let Err(e) = sink.send(line).await {
                    warn!(error = %e, "Failed to write to foreign server");
                    writer_latch.set();
                    break;
                }
            }
        });

        let pong_tx = out_tx.clone();
        let reader = tokio::spawn(async move {
            loop {
                let line = match stream.next().await {
                    Some(Ok(RawLine::Text(line))) => line,
                    Some(Ok(RawLine::Overlong(len))) => {
                        let event = ForeignEvent::Malformed {
                            raw: String::new(),
                            reason: format!("line of {len} bytes exceeds {MAX_LINE_LEN}"),
                        };
                        if events.send(event).await.is_err() {
                            debug!("Event pump gone, reader exiting");
                            return;
                        }
                        continue;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "Foreign stream error");
                        break;
                    }
                    None => {
                        info!("Connection closed by foreign server");
                        break;
                    }
                };

                let event = match line.parse::<ServerLine>() {
                    Ok(ServerLine::Event(ev)) => ev,
                    Ok(ServerLine::Ping(token)) => {
                        match ClientLine::Pong(token).encode() {
                            Ok(pong) => {
                                let _ = pong_tx.send(pong).await;
                            }
                            Err(e) => debug!(error = %e, "Unanswerable PING"),
                        }
                        continue;
                    }
                    Ok(other) => {
                        debug!(line = ?other, "Ignoring handshake line after WELCOME");
                        continue;
                    }
                    Err(e) => ForeignEvent::Malformed {
                        raw: line,
                        reason: e.to_string(),
                    },
                };

                if events.send(event).await.is_err() {
                    debug!("Event pump gone, reader exiting");
                    return;
                }
            }
            latch.set();
        });

        *self.session.lock() = Some(Session {
            outgoing: out_tx,
            reader,
            writer,
        });
        Ok(())
    }

    async fn send(&self, action: ForeignAction) -> Result<(), TransportError> {
        let line = ClientLine::Action(action).encode()?;
        let outgoing = self
            .session
            .lock()
            .as_ref()
            .map(|s| s.outgoing.clone())
            .ok_or(TransportError::NotStarted)?;
        outgoing
            .send(line)
            .await
            .map_err(|_| TransportError::NotStarted)
    }

    async fn stop(&self) {
        let Some(session) = self.session.lock().take() else {
            return;
        };
        // Aborting the reader first keeps a closing socket from raising the latch.
        session.reader.abort();
        drop(session.outgoing);
        session.writer.abort();
        debug!("Line transport stopped");
    }
}
