//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use quant_runtime::bus::{BusConnector, EventBus};
use quant_runtime::config::{DatabaseConfig, EventBusConfig};
use quant_runtime::db::{DatabaseConnector, DatabasePool};
use quant_runtime::{Components, ConnectionError};

/// Ordered record of connector calls, shared by the fakes below.
pub type Journal = Arc<Mutex<Vec<&'static str>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<&'static str> {
    journal.lock().unwrap().clone()
}

/// Database connector that answers without touching the network.
pub struct FakeDatabase {
    pub journal: Journal,
    pub fail: bool,
}

#[async_trait]
impl DatabaseConnector for FakeDatabase {
    async fn connect(&self, settings: &DatabaseConfig) -> Result<DatabasePool, ConnectionError> {
        self.journal.lock().unwrap().push("database");
        let endpoint = format!("{}:{}", settings.host, settings.port);
        if self.fail {
            return Err(refused("database", endpoint));
        }
        Ok(DatabasePool::new(settings.dbname.clone(), endpoint, Vec::new()))
    }
}

/// Bus connector that hands out a detached bus.
pub struct FakeBus {
    pub journal: Journal,
    pub fail: bool,
}

#[async_trait]
impl BusConnector for FakeBus {
    async fn connect(&self, settings: &EventBusConfig) -> Result<EventBus, ConnectionError> {
        self.journal.lock().unwrap().push("event_bus");
        let endpoint = format!("{}:{}", settings.host, settings.port);
        if self.fail {
            return Err(refused("event bus", endpoint));
        }
        Ok(EventBus::detached(endpoint, settings.exchange.clone()))
    }
}

fn refused(subsystem: &'static str, endpoint: String) -> ConnectionError {
    ConnectionError::Refused {
        subsystem,
        endpoint,
        source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
    }
}

/// Built-in registries with recording fake connectors.
pub fn components(journal: &Journal, database_fails: bool, bus_fails: bool) -> Components {
    Components {
        database: Arc::new(FakeDatabase {
            journal: journal.clone(),
            fail: database_fails,
        }),
        event_bus: Arc::new(FakeBus {
            journal: journal.clone(),
            fail: bus_fails,
        }),
        ..Components::default()
    }
}

/// Write `content` to a temporary `.json` file.
pub fn write_config(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// A port nothing is listening on.
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
