//! Shared, read-only configuration store.
//!
//! The store is built once from a validated [`Config`] and shared through an
//! `Arc`. The only later write is the event-bus binding, which happens at most
//! once, right after the bus connects.

use std::ops::Deref;

use once_cell::sync::OnceCell;
use uuid::Uuid;

use crate::bus::EventBus;
use crate::config::schema::Config;
use crate::error::BootstrapError;

/// Server identity and topics resolved once the event bus is connected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusBinding {
    /// Identity of this process on the bus.
    pub server_id: String,

    /// Exchange the bus publishes to.
    pub exchange: String,

    /// Topic carrying configuration updates addressed to this server.
    pub config_topic: String,
}

/// Loaded configuration plus state finalized during bootstrap.
#[derive(Debug)]
pub struct ConfigStore {
    config: Config,
    bus_binding: OnceCell<BusBinding>,
}

impl ConfigStore {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            bus_binding: OnceCell::new(),
        }
    }

    /// Finalize shared configuration against a connected event bus.
    ///
    /// Must only be called after the bus reports connected. A second call is
    /// rejected and leaves the first binding in place.
    pub fn bind_event_bus(&self, bus: &EventBus) -> Result<&BusBinding, BootstrapError> {
        let server_id = self
            .config
            .server_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let binding = BusBinding {
            config_topic: format!("config.{}", server_id),
            exchange: bus.exchange().to_string(),
            server_id,
        };

        self.bus_binding
            .set(binding)
            .map_err(|_| BootstrapError::AlreadyBound)?;

        let binding = self.bus_binding.get().ok_or(BootstrapError::AlreadyBound)?;
        tracing::info!(
            server_id = %binding.server_id,
            exchange = %binding.exchange,
            config_topic = %binding.config_topic,
            "Configuration bound to event bus"
        );
        Ok(binding)
    }

    /// The event-bus binding, if the bus was enabled and connected.
    pub fn bus_binding(&self) -> Option<&BusBinding> {
        self.bus_binding.get()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Deref for ConfigStore {
    type Target = Config;

    fn deref(&self) -> &Config {
        &self.config
    }
}
