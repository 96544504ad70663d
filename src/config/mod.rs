//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON/TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → Config (validated, immutable)
//!     → store.rs (ConfigStore, shared via Arc to all subsystems)
//!
//! After the event bus connects:
//!     store.rs binds server identity and topics (write-once)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - A missing section disables its subsystem; keys inside a section default
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{Config, DatabaseConfig, EventBusConfig, HeartbeatConfig, HttpServerConfig, LogConfig};
pub use store::{BusBinding, ConfigStore};
pub use validation::ValidationError;
