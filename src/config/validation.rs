//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Enforce mandatory keys inside present sections (HTTP port)
//! - Validate value ranges (timeouts > 0, pool sizes > 0, known log levels)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Config → Result<(), Vec<ValidationError>>
//! - Runs before any subsystem is touched

use std::fmt;

use crate::config::schema::Config;

/// A single semantic problem in a configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending key.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration, collecting every error found.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(log) = &config.log {
        if log.level_filter().is_none() {
            errors.push(ValidationError::new(
                "log.level",
                format!("unknown level '{}'", log.level),
            ));
        }
        if !log.console && log.name.trim().is_empty() {
            errors.push(ValidationError::new("log.name", "file name must not be empty"));
        }
    }

    if let Some(db) = &config.database {
        if db.host.trim().is_empty() {
            errors.push(ValidationError::new("database.host", "must not be empty"));
        }
        if db.pool_size == 0 {
            errors.push(ValidationError::new("database.pool_size", "must be at least 1"));
        }
        if db.connect_timeout_secs == 0 {
            errors.push(ValidationError::new("database.connect_timeout_secs", "must be greater than 0"));
        }
    }

    if let Some(bus) = &config.event_bus {
        if bus.host.trim().is_empty() {
            errors.push(ValidationError::new("eventBus.host", "must not be empty"));
        }
        if bus.connect_timeout_secs == 0 {
            errors.push(ValidationError::new("eventBus.connect_timeout_secs", "must be greater than 0"));
        }
    }

    if let Some(http) = &config.http_server {
        if http.port.is_none() {
            errors.push(ValidationError::new("httpServer.port", "is required"));
        }
        if http.host.trim().is_empty() {
            errors.push(ValidationError::new("httpServer.host", "must not be empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
