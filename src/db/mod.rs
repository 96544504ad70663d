//! Database connection pool adapter.
//!
//! The driver itself is an external collaborator. This module owns only the
//! activation boundary: a [`DatabaseConnector`] turns a `database` section
//! into a ready [`DatabasePool`], or fails with a [`ConnectionError`].

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::config::DatabaseConfig;
use crate::error::ConnectionError;
use crate::net::connector;

/// Builds a database pool from its configuration section.
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    /// Open the pool, returning once it is ready for use.
    async fn connect(&self, settings: &DatabaseConfig) -> Result<DatabasePool, ConnectionError>;
}

/// A set of open connections to one database endpoint.
#[derive(Debug)]
pub struct DatabasePool {
    database: String,
    endpoint: String,
    connections: Mutex<Vec<TcpStream>>,
}

impl DatabasePool {
    pub fn new(database: impl Into<String>, endpoint: impl Into<String>, connections: Vec<TcpStream>) -> Self {
        Self {
            database: database.into(),
            endpoint: endpoint.into(),
            connections: Mutex::new(connections),
        }
    }

    /// Logical database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Number of idle connections held by the pool.
    pub async fn idle(&self) -> usize {
        self.connections.lock().await.len()
    }
}

/// Connector that eagerly opens `pool_size` TCP connections.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpDatabaseConnector;

#[async_trait]
impl DatabaseConnector for TcpDatabaseConnector {
    async fn connect(&self, settings: &DatabaseConfig) -> Result<DatabasePool, ConnectionError> {
        let mut connections = Vec::with_capacity(settings.pool_size);
        for _ in 0..settings.pool_size {
            let stream = connector::connect(
                "database",
                &settings.host,
                settings.port,
                settings.connect_timeout_secs,
            )
            .await?;
            connections.push(stream);
        }

        let endpoint = format!("{}:{}", settings.host, settings.port);
        tracing::info!(
            endpoint = %endpoint,
            database = %settings.dbname,
            pool_size = settings.pool_size,
            "Database pool connected"
        );

        Ok(DatabasePool::new(settings.dbname.clone(), endpoint, connections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_tcp_connector_fills_pool() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let settings = DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port,
            pool_size: 3,
            ..DatabaseConfig::default()
        };

        let pool = TcpDatabaseConnector.connect(&settings).await.unwrap();
        assert_eq!(pool.idle().await, 3);
        assert_eq!(pool.database(), "quant");
        assert_eq!(pool.endpoint(), format!("127.0.0.1:{}", port));
    }
}
