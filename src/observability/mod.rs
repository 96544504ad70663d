//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!
//! Consumers:
//!     → stdout (console sink)
//!     → rotating log files (file sink)
//! ```
//!
//! # Design Decisions
//! - Logging is configured before any other subsystem starts
//! - Structured fields instead of formatted strings

pub mod logging;
