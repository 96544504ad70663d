//! Outbound TCP connections with a connect deadline.
//!
//! Shared by the database and event-bus adapters. A connection attempt is
//! made once; there is no retry.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::ConnectionError;

/// Open a TCP connection to `host:port`, failing after `timeout_secs`.
pub async fn connect(
    subsystem: &'static str,
    host: &str,
    port: u16,
    timeout_secs: u64,
) -> Result<TcpStream, ConnectionError> {
    let endpoint = format!("{}:{}", host, port);

    tracing::debug!(subsystem, endpoint = %endpoint, "Connecting");

    match timeout(Duration::from_secs(timeout_secs), TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => {
            // Small control messages; flush them immediately.
            if let Err(e) = stream.set_nodelay(true) {
                tracing::warn!(subsystem, error = %e, "Failed to set TCP_NODELAY");
            }
            Ok(stream)
        }
        Ok(Err(source)) => Err(ConnectionError::Refused {
            subsystem,
            endpoint,
            source,
        }),
        Err(_) => Err(ConnectionError::Timeout {
            subsystem,
            endpoint,
            timeout_secs,
        }),
    }
}
