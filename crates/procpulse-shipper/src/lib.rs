//! TCP event shipper for the procpulse agent.
//!
//! Owns the single outbound connection to the collector and drains the
//! bounded [`backlog`]. Each payload is written as one newline-terminated
//! UTF-8 message; there is no length prefix and no acknowledgement. Failures
//! are classified as retryable (timeout, remote close, transient I/O), which
//! trigger an unbounded fixed-interval reconnect loop, or fatal (unusable
//! collector address), which stops the agent.

pub mod backlog;
pub mod error;
pub mod mirror;

use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};
use tokio::io::AsyncWriteExt;
use tokio::net::{lookup_host, TcpStream};
use tokio::time::{sleep, timeout};

use backlog::BacklogReceiver;
pub use error::ShipError;
use error::Result;
pub use mirror::{ConsoleMirror, EventMirror};

/// Fixed pause between reconnection attempts. No exponential growth and no
/// retry cap: the collector is assumed to come back eventually, and the
/// shipper must resume without operator intervention.
pub const RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// TCP keep-alive probe time and interval.
const KEEPALIVE_PERIOD: Duration = Duration::from_secs(5);

/// Default per-write deadline.
pub const DEFAULT_SOCKET_TIMEOUT: Duration = Duration::from_millis(5000);

/// Connection lifecycle state, owned exclusively by the shipper task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// A send failure was observed and reconnection has not started yet.
    Degraded,
}

/// The event shipper. There is no terminal failure state short of a fatal
/// configuration error; the machine always retries.
pub struct Shipper {
    host: String,
    port: u16,
    socket_timeout: Duration,
    connection: Option<TcpStream>,
    state: ConnectionState,
    mirror: Option<Box<dyn EventMirror>>,
}

impl Shipper {
    pub fn new(host: impl Into<String>, port: u16, socket_timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            socket_timeout,
            connection: None,
            state: ConnectionState::Disconnected,
            mirror: None,
        }
    }

    /// Mirrors every dequeued payload to the given diagnostic sink,
    /// independent of network success or failure.
    pub fn with_mirror(mut self, mirror: Box<dyn EventMirror>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolves the collector address and opens a fresh connection,
    /// configured for low-latency delivery: no send coalescing, keep-alive
    /// probing, linger disabled so close never blocks.
    pub async fn connect(&mut self) -> Result<()> {
        self.state = ConnectionState::Connecting;
        let endpoint = self.endpoint();

        let addr = match resolve(&endpoint).await {
            Ok(addr) => addr,
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                return Err(e);
            }
        };

        let connect_err = |e| ShipError::Connect {
            addr: endpoint.clone(),
            source: e,
        };
        let stream = match TcpStream::connect(addr).await {
            Ok(stream) => stream,
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                return Err(connect_err(e));
            }
        };
        if let Err(e) = configure_socket(&stream) {
            self.state = ConnectionState::Disconnected;
            return Err(connect_err(e));
        }

        tracing::info!(collector = %endpoint, "Connected to collector");
        self.connection = Some(stream);
        self.state = ConnectionState::Connected;
        Ok(())
    }

    /// Closes the current connection, then retries [`Shipper::connect`]
    /// every [`RETRY_INTERVAL`] until it succeeds or fails fatally.
    async fn reconnect(&mut self) -> Result<()> {
        // Linger is off, so dropping the stream never blocks.
        self.connection = None;
        self.state = ConnectionState::Disconnected;
        loop {
            sleep(RETRY_INTERVAL).await;
            tracing::info!("Reconnecting ...");
            match self.connect().await {
                Ok(()) => {
                    tracing::info!("Connection re-established");
                    return Ok(());
                }
                Err(e) if e.is_retryable() => {
                    tracing::warn!(error = %e, "Reconnection attempt failed");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Writes one payload, newline-terminated, within the socket deadline.
    ///
    /// On remote close the connection is re-established and the same payload
    /// is retried until it goes through. On timeout or any other I/O error
    /// the payload is discarded, reconnection happens, and the failure is
    /// returned. The asymmetry is long-standing observed behavior and is
    /// kept as-is.
    pub async fn send(&mut self, payload: &str) -> Result<()> {
        let mut framed = String::with_capacity(payload.len() + 1);
        framed.push_str(payload);
        framed.push('\n');

        loop {
            let Some(stream) = self.connection.as_mut() else {
                return Err(ShipError::NotConnected);
            };
            match timeout(self.socket_timeout, stream.write_all(framed.as_bytes())).await {
                Ok(Ok(())) => return Ok(()),
                Err(_elapsed) => {
                    tracing::warn!(
                        timeout_ms = self.socket_timeout.as_millis() as u64,
                        "Socket timeout, message discarded"
                    );
                    self.state = ConnectionState::Degraded;
                    self.reconnect().await?;
                    return Err(ShipError::Timeout {
                        timeout_ms: self.socket_timeout.as_millis() as u64,
                    });
                }
                Ok(Err(e)) if is_remote_close(&e) => {
                    tracing::warn!(error = %e, "Collector closed the connection, retrying message");
                    self.state = ConnectionState::Degraded;
                    self.reconnect().await?;
                    // Same payload again on the new connection.
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "Connection error, message discarded");
                    self.state = ConnectionState::Degraded;
                    self.reconnect().await?;
                    return Err(ShipError::Io(e));
                }
            }
        }
    }

    /// Drains the backlog forever: pop, mirror, send. Performs the initial
    /// connect (with the usual retry semantics) before entering the loop.
    /// Returns cleanly once the producer side of the backlog is gone, or
    /// with an error on a fatal failure.
    pub async fn drain(&mut self, mut backlog: BacklogReceiver) -> Result<()> {
        if let Err(e) = self.connect().await {
            if !e.is_retryable() {
                return Err(e);
            }
            tracing::warn!(error = %e, "Initial connection attempt failed");
            self.reconnect().await?;
        }

        while let Some(payload) = backlog.pop().await {
            if let Some(mirror) = &self.mirror {
                mirror.mirror(&payload);
            }
            match self.send(&payload).await {
                Ok(()) => {}
                // Already logged at the failure site; the payload is gone.
                Err(e) if e.is_retryable() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

async fn resolve(endpoint: &str) -> Result<std::net::SocketAddr> {
    match lookup_host(endpoint).await {
        Ok(mut addrs) => addrs.next().ok_or_else(|| ShipError::Resolve {
            addr: endpoint.to_string(),
            source: None,
        }),
        Err(e) => Err(ShipError::Resolve {
            addr: endpoint.to_string(),
            source: Some(e),
        }),
    }
}

/// End-of-stream style failures: the collector went away and the message
/// should be retried on a fresh connection.
fn is_remote_close(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::WriteZero
    )
}

fn configure_socket(stream: &TcpStream) -> std::io::Result<()> {
    stream.set_nodelay(true)?;
    let sock = SockRef::from(stream);
    sock.set_keepalive(true)?;
    sock.set_tcp_keepalive(
        &TcpKeepalive::new()
            .with_time(KEEPALIVE_PERIOD)
            .with_interval(KEEPALIVE_PERIOD),
    )?;
    // Close must never block; pending data is dropped with the connection.
    sock.set_linger(Some(Duration::from_secs(0)))?;
    Ok(())
}
