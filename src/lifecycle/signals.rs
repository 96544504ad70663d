//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT (Ctrl+C, or the platform equivalent)
//! - Acknowledge it on stdout
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGINT only; the caller decides what stopping means
//! - No cleanup here: the loop is stopped, nothing is drained

/// Resolves when SIGINT is received.
///
/// The handler is installed the first time the future is polled. If it
/// cannot be installed the future never resolves.
pub async fn interrupt() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            println!("Interrupt signal (SIGINT) caught, stopping the scheduler.");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    }
}
