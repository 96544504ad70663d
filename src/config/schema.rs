//! Configuration schema definitions.
//!
//! Every subsystem section is optional. A missing section disables the
//! subsystem; it never falls back to a built-in instance of it. Keys inside a
//! present section default individually.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::level_filters::LevelFilter;

/// Root configuration for the runtime.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Logging sinks. Absent means console logging at DEBUG.
    pub log: Option<LogConfig>,

    /// Database connection pool settings.
    pub database: Option<DatabaseConfig>,

    /// Message bus transport settings.
    pub event_bus: Option<EventBusConfig>,

    /// HTTP server settings.
    pub http_server: Option<HttpServerConfig>,

    /// Heartbeat reporting settings.
    pub heartbeat: Option<HeartbeatConfig>,

    /// Identity announced on the event bus. Generated when absent.
    pub server_id: Option<String>,

    /// User-defined sections, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Config {
    /// Deserialize a user-defined section.
    ///
    /// Returns `None` when the section is absent or explicitly `null`.
    pub fn section<T: DeserializeOwned>(&self, name: &str) -> Option<Result<T, serde_json::Error>> {
        match self.extra.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => Some(T::deserialize(value)),
        }
    }
}

/// Logging sink configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log to stdout. When false, log to a rotating file instead.
    pub console: bool,

    /// Minimum level, case-insensitive: trace, debug, info, warn, error,
    /// off. `warning`, `critical`, `fatal` and `notset` are accepted as
    /// aliases.
    pub level: String,

    /// Directory holding log files.
    pub path: String,

    /// Log file name prefix.
    pub name: String,

    /// Remove previous log files on startup.
    pub clear: bool,

    /// Number of rotated files to keep (0 keeps all).
    pub backup_count: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console: true,
            level: "DEBUG".to_string(),
            path: "/tmp/logs/Quant".to_string(),
            name: "quant.log".to_string(),
            clear: false,
            backup_count: 0,
        }
    }
}

impl LogConfig {
    /// The configured level, or `None` if it names no known level.
    pub fn level_filter(&self) -> Option<LevelFilter> {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "warning" => Some(LevelFilter::WARN),
            "critical" | "fatal" => Some(LevelFilter::ERROR),
            "notset" => Some(LevelFilter::TRACE),
            other => other.parse().ok(),
        }
    }
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,

    /// Logical database name.
    pub dbname: String,

    /// Number of connections opened eagerly.
    pub pool_size: usize,

    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 27017,
            dbname: "quant".to_string(),
            pool_size: 1,
            connect_timeout_secs: 10,
        }
    }
}

/// Message bus configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EventBusConfig {
    pub host: String,
    pub port: u16,

    /// Exchange name stamped on every published message.
    pub exchange: String,

    pub connect_timeout_secs: u64,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5672,
            exchange: "Quant".to_string(),
            connect_timeout_secs: 10,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_host")]
    pub host: String,

    /// Listen port. Required; validation rejects a section without it.
    #[serde(default)]
    pub port: Option<u16>,

    /// API modules to load, by registered name.
    #[serde(default)]
    pub apis: Vec<String>,

    /// Middleware references (`module.attribute`), outermost first.
    #[serde(default)]
    pub middlewares: Vec<String>,
}

fn default_http_host() -> String {
    "localhost".to_string()
}

/// Heartbeat reporting configuration. Both values count ticks; 0 disables.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HeartbeatConfig {
    /// Log the tick count every `interval` ticks.
    pub interval: u64,

    /// Publish an alive message on the event bus every `broadcast` ticks.
    pub broadcast: u64,
}
