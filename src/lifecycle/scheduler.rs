//! The process scheduler.
//!
//! One single-threaded Tokio runtime, created on first access and reused for
//! every later request. Subsystems borrow it; none builds its own.

use once_cell::sync::OnceCell;
use tokio::runtime::{Builder, Handle, Runtime};

use crate::error::BootstrapError;

#[derive(Debug, Default)]
pub struct Scheduler {
    runtime: OnceCell<Runtime>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The runtime, built on first call.
    pub fn runtime(&self) -> Result<&Runtime, BootstrapError> {
        self.runtime.get_or_try_init(|| {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .thread_name("quant-loop")
                .build()
                .map_err(BootstrapError::Scheduler)?;
            tracing::debug!("Scheduler created");
            Ok(runtime)
        })
    }

    /// Whether the runtime has been built yet.
    pub fn is_created(&self) -> bool {
        self.runtime.get().is_some()
    }

    /// Handle for spawning onto the runtime, if it exists.
    pub fn handle(&self) -> Option<Handle> {
        self.runtime.get().map(|runtime| runtime.handle().clone())
    }
}
