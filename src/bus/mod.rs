//! Event bus client adapter.
//!
//! # Data Flow
//! ```text
//! Phase 1 (this module):
//!     eventBus section → BusConnector::connect → EventBus (transport ready)
//!
//! Phase 2 (config/store.rs):
//!     ConfigStore::bind_event_bus(&EventBus) → BusBinding (write-once)
//! ```
//!
//! # Design Decisions
//! - Connect is attempted once with a deadline; failure aborts bootstrap
//! - Messages are newline-delimited JSON envelopes stamped with the exchange

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::config::EventBusConfig;
use crate::error::ConnectionError;
use crate::net::connector;

/// Establishes the bus transport from its configuration section.
#[async_trait]
pub trait BusConnector: Send + Sync {
    /// Connect, returning once the transport is established.
    async fn connect(&self, settings: &EventBusConfig) -> Result<EventBus, ConnectionError>;
}

/// Write half of the bus transport.
pub type Transport = Box<dyn AsyncWrite + Send + Unpin>;

#[derive(Serialize)]
struct Envelope<'a> {
    exchange: &'a str,
    topic: &'a str,
    payload: &'a Value,
}

/// A connected event bus client.
pub struct EventBus {
    endpoint: String,
    exchange: String,
    transport: Mutex<Transport>,
}

impl EventBus {
    pub fn new(endpoint: impl Into<String>, exchange: impl Into<String>, transport: Transport) -> Self {
        Self {
            endpoint: endpoint.into(),
            exchange: exchange.into(),
            transport: Mutex::new(transport),
        }
    }

    /// A bus whose messages are discarded. Useful for embedding and tests.
    pub fn detached(endpoint: impl Into<String>, exchange: impl Into<String>) -> Self {
        Self::new(endpoint, exchange, Box::new(tokio::io::sink()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Publish one message on `topic`.
    pub async fn publish(&self, topic: &str, payload: &Value) -> std::io::Result<()> {
        let envelope = Envelope {
            exchange: &self.exchange,
            topic,
            payload,
        };
        let mut line = serde_json::to_vec(&envelope)?;
        line.push(b'\n');

        let mut transport = self.transport.lock().await;
        transport.write_all(&line).await?;
        transport.flush().await
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("endpoint", &self.endpoint)
            .field("exchange", &self.exchange)
            .finish_non_exhaustive()
    }
}

/// Connector that speaks to the broker over a plain TCP stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpBusConnector;

#[async_trait]
impl BusConnector for TcpBusConnector {
    async fn connect(&self, settings: &EventBusConfig) -> Result<EventBus, ConnectionError> {
        let stream = connector::connect(
            "event bus",
            &settings.host,
            settings.port,
            settings.connect_timeout_secs,
        )
        .await?;

        let endpoint = format!("{}:{}", settings.host, settings.port);
        tracing::info!(
            endpoint = %endpoint,
            exchange = %settings.exchange,
            "Event bus connected"
        );

        Ok(EventBus::new(endpoint, settings.exchange.clone(), Box::new(stream)))
    }
}
