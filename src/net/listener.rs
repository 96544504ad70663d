//! TCP listener binding for the HTTP server.
//!
//! # Responsibilities
//! - Resolve the configured host (names like `localhost` included)
//! - Bind the listening socket
//! - Report the bound address for logging

use std::net::SocketAddr;

use tokio::net::TcpListener;

/// Error type for listener binding.
#[derive(Debug)]
pub struct BindError {
    /// Requested `host:port`.
    pub address: String,
    pub source: std::io::Error,
}

impl std::fmt::Display for BindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to bind {}: {}", self.address, self.source)
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Bind a listener on `host:port`.
///
/// Port 0 asks the OS for a free port; use [`TcpListener::local_addr`] on
/// the result to learn which one.
pub async fn bind(host: &str, port: u16) -> Result<(TcpListener, SocketAddr), BindError> {
    let address = format!("{}:{}", host, port);

    let listener = TcpListener::bind((host, port))
        .await
        .map_err(|source| BindError {
            address: address.clone(),
            source,
        })?;

    let local_addr = listener.local_addr().map_err(|source| BindError {
        address: address.clone(),
        source,
    })?;

    tracing::debug!(
        requested = %address,
        address = %local_addr,
        "Listener bound"
    );

    Ok((listener, local_addr))
}
