//! Lifecycle state and stop coordination.
//!
//! The state lives in a watch channel so `start()` can wait for `Stopped`
//! while any thread or task holding a [`StopHandle`] requests it.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::BootstrapError;

/// Orchestrator lifecycle.
///
/// ```text
/// Uninitialized → Initializing → Running → Stopped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initializing,
    Running,
    /// Terminal.
    Stopped,
}

/// Shared lifecycle state.
#[derive(Debug, Clone)]
pub(crate) struct Lifecycle {
    tx: Arc<watch::Sender<LifecycleState>>,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(LifecycleState::Uninitialized);
        Self { tx: Arc::new(tx) }
    }

    pub(crate) fn state(&self) -> LifecycleState {
        *self.tx.borrow()
    }

    /// Move `from → to`, or report the state actually found.
    pub(crate) fn transition(
        &self,
        operation: &'static str,
        from: LifecycleState,
        to: LifecycleState,
    ) -> Result<(), BootstrapError> {
        let mut actual = from;
        let moved = self.tx.send_if_modified(|state| {
            if *state == from {
                *state = to;
                true
            } else {
                actual = *state;
                false
            }
        });

        if moved {
            Ok(())
        } else {
            Err(BootstrapError::InvalidState { operation, actual })
        }
    }

    /// Resolves once the state reaches `Stopped`.
    pub(crate) async fn stopped(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|state| *state == LifecycleState::Stopped).await;
    }
}

/// Cloneable handle that stops a running orchestrator.
#[derive(Debug, Clone)]
pub struct StopHandle {
    lifecycle: Lifecycle,
}

impl StopHandle {
    pub(crate) fn new(lifecycle: Lifecycle) -> Self {
        Self { lifecycle }
    }

    /// Halt the scheduler loop.
    ///
    /// Only acts while running. Outstanding tasks are not awaited. Returns
    /// whether this call performed the stop.
    pub fn stop(&self) -> bool {
        let stopped = self.lifecycle.tx.send_if_modified(|state| {
            if *state == LifecycleState::Running {
                *state = LifecycleState::Stopped;
                true
            } else {
                false
            }
        });

        if stopped {
            tracing::info!("Stopping scheduler loop");
        } else {
            tracing::debug!(state = ?self.lifecycle.state(), "Stop ignored, scheduler not running");
        }
        stopped
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }
}
