//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator (orchestrator.rs):
//!     initialize() → ordered bootstrap on the scheduler
//!     start()      → run the scheduler until Stopped
//!
//! Scheduler (scheduler.rs):
//!     One current-thread runtime, built on first access
//!
//! Shutdown (shutdown.rs):
//!     stop() / StopHandle → Running → Stopped
//!
//! Signals (signals.rs):
//!     SIGINT → acknowledge → stop()
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then scheduler, logging, subsystems
//! - Stop halts the loop; nothing is drained

pub mod orchestrator;
pub mod scheduler;
pub mod shutdown;
pub mod signals;

pub use orchestrator::{Components, Orchestrator, HEARTBEAT_DELAY};
pub use scheduler::Scheduler;
pub use shutdown::{LifecycleState, StopHandle};
