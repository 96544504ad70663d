//! Bootstrap error taxonomy.
//!
//! Every failure during `initialize()` is fatal and surfaces as a
//! [`BootstrapError`]. Nothing here is retried.

use thiserror::Error;

use crate::config::ConfigError;
use crate::lifecycle::LifecycleState;
use crate::net::listener::BindError;

/// Transport failure while activating the database or the event bus.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The peer did not answer within the configured timeout.
    #[error("{subsystem} connection to {endpoint} timed out after {timeout_secs} seconds")]
    Timeout {
        subsystem: &'static str,
        endpoint: String,
        timeout_secs: u64,
    },

    /// The connection was refused or could not be established.
    #[error("{subsystem} connection to {endpoint} failed: {source}")]
    Refused {
        subsystem: &'static str,
        endpoint: String,
        #[source]
        source: std::io::Error,
    },
}

/// An API or middleware reference that does not resolve.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("unknown API module '{0}'")]
    UnknownApi(String),

    #[error("malformed middleware reference '{0}', expected 'module.attribute'")]
    MalformedReference(String),

    #[error("unknown middleware module '{module}' in '{reference}'")]
    UnknownModule { reference: String, module: String },

    #[error("middleware module '{module}' has no attribute '{attribute}'")]
    MissingAttribute { module: String, attribute: String },

    /// The router refused a registered path.
    #[error("invalid route '{path}': {reason}")]
    InvalidRoute { path: String, reason: String },
}

/// Any fatal bootstrap failure.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The scheduler runtime could not be built.
    #[error("failed to create scheduler: {0}")]
    Scheduler(#[source] std::io::Error),

    /// A file log sink could not be prepared.
    #[error("failed to configure logging: {0}")]
    Logging(#[source] std::io::Error),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Bind(#[from] BindError),

    /// A lifecycle operation was called in the wrong state.
    #[error("cannot {operation} while {actual:?}")]
    InvalidState {
        operation: &'static str,
        actual: LifecycleState,
    },

    /// Configuration was already bound to an event bus.
    #[error("configuration is already bound to an event bus")]
    AlreadyBound,
}

/// Result type for bootstrap operations.
pub type BootstrapResult<T> = Result<T, BootstrapError>;
