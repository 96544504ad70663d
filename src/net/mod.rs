//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound (HTTP server):
//!     listener.rs (resolve host, bind socket) → axum::serve accept loop
//!
//! Outbound (database, event bus):
//!     connector.rs (TCP connect with deadline) → adapter handle
//! ```
//!
//! # Design Decisions
//! - Every outbound connect has a deadline and is attempted once
//! - Bind failures carry the requested address for diagnostics

pub mod connector;
pub mod listener;
