//! Process lifecycle runtime for event-driven services.
//!
//! One [`Orchestrator`] per process loads a configuration document, brings
//! up the configured subsystems in a fixed order on a single-threaded
//! scheduler, then runs that scheduler until SIGINT.

// Core subsystems
pub mod config;
pub mod http;
pub mod net;

// Optional collaborators
pub mod api;
pub mod bus;
pub mod db;
pub mod heartbeat;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use config::{Config, ConfigStore};
pub use error::{BootstrapError, BootstrapResult, ConnectionError, ResolutionError};
pub use http::HttpServer;
pub use lifecycle::{Components, LifecycleState, Orchestrator, StopHandle};
