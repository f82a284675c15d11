/// Errors raised by the event shipper.
///
/// Every variant except [`ShipError::Resolve`] is retryable: the shipper
/// handles it locally with an unbounded reconnect loop. A resolution
/// failure means the configured collector address is unusable and no amount
/// of retrying will fix it, so it propagates and stops the agent.
#[derive(Debug, thiserror::Error)]
pub enum ShipError {
    /// The collector address could not be resolved.
    #[error("shipper: cannot resolve collector address '{addr}'")]
    Resolve {
        addr: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Opening or configuring the TCP connection failed.
    #[error("shipper: connect to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// A write did not complete within the socket deadline. The in-flight
    /// payload is discarded.
    #[error("shipper: write timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// A write failed for a reason other than timeout or remote close. The
    /// in-flight payload is discarded.
    #[error("shipper: I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `send` was called with no established connection.
    #[error("shipper: not connected")]
    NotConnected,
}

impl ShipError {
    /// Whether the shipper can recover from this error by reconnecting.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ShipError::Resolve { .. })
    }
}

/// Convenience `Result` alias for shipper operations.
pub type Result<T> = std::result::Result<T, ShipError>;
