// Publish sink with reconnect
// Best-effort, fire-and-forget delivery: a failed message is dropped, never
// retried; the connection is re-established asynchronously instead.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{info, warn};

use crate::constants::RECONNECT_BACKOFF_SECS;
use crate::pipeline::ProcessError;

/// An established connection to the sink.
#[async_trait]
pub trait SinkTransport: Send {
    /// Deliver one framed message.
    async fn send(&mut self, frame: &[u8]) -> io::Result<()>;
}

/// Dials new sink connections; cloned into the reconnect task.
#[async_trait]
pub trait SinkConnector: Send + Sync {
    async fn connect(&self) -> io::Result<Box<dyn SinkTransport>>;
}

/// TCP sink connector for a fixed address.
pub struct TcpConnector {
    addr: String,
}

impl TcpConnector {
    pub fn new(addr: String) -> Self {
        TcpConnector { addr }
    }
}

#[async_trait]
impl SinkConnector for TcpConnector {
    async fn connect(&self) -> io::Result<Box<dyn SinkTransport>> {
        let stream = TcpStream::connect(&self.addr).await?;
        Ok(Box::new(TcpSink {
            writer: tokio::io::BufWriter::new(stream),
        }))
    }
}

struct TcpSink {
    writer: tokio::io::BufWriter<TcpStream>,
}

#[async_trait]
impl SinkTransport for TcpSink {
    async fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        self.writer.write_all(frame).await?;
        self.writer.flush().await
    }
}

/// Connection state of the publisher.
enum SinkState {
    Connected(Box<dyn SinkTransport>),
    Reconnecting,
}

/// Publisher for encoded fleet messages.
///
/// While `Connected`, publishes go straight through the transport. A write
/// failure drops that message, flips the state to `Reconnecting`, and spawns
/// a single reconnect task; publish attempts made while reconnecting
/// short-circuit to an immediate delivery failure rather than probing the
/// broken connection, so one failure streak triggers exactly one reconnect.
/// The replacement transport is picked up as an atomic handle swap at the
/// next publish attempt.
pub struct Publisher {
    connector: Arc<dyn SinkConnector>,
    state: SinkState,
    reconnect_rx: Option<mpsc::Receiver<Box<dyn SinkTransport>>>,
    dial_timeout: Duration,
    reconnects: u64,
}

impl Publisher {
    /// Establish the initial sink connection.
    pub async fn connect(
        connector: Arc<dyn SinkConnector>,
        dial_timeout: Duration,
    ) -> io::Result<Self> {
        let transport = time::timeout(dial_timeout, connector.connect())
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "sink connect timed out"))??;

        Ok(Publisher {
            connector,
            state: SinkState::Connected(transport),
            reconnect_rx: None,
            dial_timeout,
            reconnects: 0,
        })
    }

    /// Is the sink connection currently established?
    pub fn is_connected(&self) -> bool {
        matches!(self.state, SinkState::Connected(_))
    }

    /// Number of reconnects started so far.
    pub fn reconnect_count(&self) -> u64 {
        self.reconnects
    }

    /// Deliver an encoded payload under the given supply label.
    ///
    /// On failure the payload is lost; the caller moves on to the next
    /// record.
    pub async fn publish(&mut self, label: &str, payload: &[u8]) -> Result<(), ProcessError> {
        self.poll_reconnected();

        let frame = frame_message(label, payload)?;

        match &mut self.state {
            SinkState::Reconnecting => Err(ProcessError::Delivery(
                "sink connection is re-establishing".to_string(),
            )),
            SinkState::Connected(transport) => {
                if let Err(e) = transport.send(&frame).await {
                    warn!("Publish failed, dropping message and reconnecting: {}", e);
                    self.begin_reconnect();
                    return Err(ProcessError::Delivery(e.to_string()));
                }
                Ok(())
            }
        }
    }

    /// Swap in a completed reconnect, if one is waiting.
    fn poll_reconnected(&mut self) {
        if !matches!(self.state, SinkState::Reconnecting) {
            return;
        }
        let Some(rx) = &mut self.reconnect_rx else {
            return;
        };

        match rx.try_recv() {
            Ok(transport) => {
                self.state = SinkState::Connected(transport);
                self.reconnect_rx = None;
                info!("Sink reconnected");
            }
            Err(mpsc::error::TryRecvError::Empty) => {}
            Err(mpsc::error::TryRecvError::Disconnected) => {
                // Reconnect task went away without delivering a transport
                self.reconnect_rx = None;
                self.begin_reconnect();
            }
        }
    }

    fn begin_reconnect(&mut self) {
        self.state = SinkState::Reconnecting;
        self.reconnects += 1;

        let (tx, rx) = mpsc::channel(1);
        self.reconnect_rx = Some(rx);

        let connector = Arc::clone(&self.connector);
        let dial_timeout = self.dial_timeout;
        tokio::spawn(async move {
            reconnect_loop(connector, dial_timeout, tx).await;
        });
    }
}

/// Dial until a connection is established, then hand it to the publisher.
async fn reconnect_loop(
    connector: Arc<dyn SinkConnector>,
    dial_timeout: Duration,
    tx: mpsc::Sender<Box<dyn SinkTransport>>,
) {
    loop {
        match time::timeout(dial_timeout, connector.connect()).await {
            Ok(Ok(transport)) => {
                // Send fails only if the publisher itself is gone
                let _ = tx.send(transport).await;
                return;
            }
            Ok(Err(e)) => warn!("Sink reconnect failed: {}", e),
            Err(_) => warn!("Sink reconnect timed out after {:?}", dial_timeout),
        }
        time::sleep(Duration::from_secs(RECONNECT_BACKOFF_SECS)).await;
    }
}

/// Frame a labelled payload for the sink: label length (u8), label bytes,
/// payload length (u16 big-endian), payload bytes.
pub(crate) fn frame_message(label: &str, payload: &[u8]) -> Result<Vec<u8>, ProcessError> {
    if label.len() > u8::MAX as usize {
        return Err(ProcessError::Encoding(format!(
            "supply label exceeds 255 bytes: {}",
            label.len()
        )));
    }
    if payload.len() > u16::MAX as usize {
        return Err(ProcessError::Encoding(format!(
            "payload exceeds 65535 bytes: {}",
            payload.len()
        )));
    }

    let mut frame = Vec::with_capacity(1 + label.len() + 2 + payload.len());
    frame.push(label.len() as u8);
    frame.extend_from_slice(label.as_bytes());
    frame.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    frame.extend_from_slice(payload);
    Ok(frame)
}
