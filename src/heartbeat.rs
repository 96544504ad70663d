//! Server heartbeat.
//!
//! # Responsibilities
//! - Tick once per second for the life of the process
//! - Run registered periodic tasks on ticks divisible by their interval
//! - Log the tick count and broadcast an alive message when configured
//!
//! # Design Decisions
//! - The orchestrator only schedules the first run; recurrence lives here
//! - Tasks are spawned, so a slow task never delays the next tick
//! - The task table lock is never held across an await point
//! - At most one broadcast is in flight; ticks due while it is pending skip

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tokio::time::{self, MissedTickBehavior};
use uuid::Uuid;

use crate::bus::EventBus;
use crate::config::HeartbeatConfig;

/// Time between two ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

type TaskFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type TaskFn = Arc<dyn Fn(u64) -> TaskFuture + Send + Sync>;

struct Task {
    interval: u64,
    run: TaskFn,
}

struct Broadcast {
    bus: Arc<EventBus>,
    server_id: String,
    in_flight: Arc<AtomicBool>,
}

pub struct Heartbeat {
    settings: HeartbeatConfig,
    count: AtomicU64,
    tasks: Mutex<HashMap<Uuid, Task>>,
    broadcast: Option<Broadcast>,
}

impl Heartbeat {
    pub fn new(settings: HeartbeatConfig) -> Self {
        Self {
            settings,
            count: AtomicU64::new(0),
            tasks: Mutex::new(HashMap::new()),
            broadcast: None,
        }
    }

    /// Publish alive messages for `server_id` on `bus`.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>, server_id: impl Into<String>) -> Self {
        self.broadcast = Some(Broadcast {
            bus,
            server_id: server_id.into(),
            in_flight: Arc::new(AtomicBool::new(false)),
        });
        self
    }

    /// Ticks elapsed so far.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Run `task` every `interval` ticks. The task receives the tick count.
    ///
    /// An interval of 0 is treated as 1.
    pub fn register<F, Fut>(&self, interval: u64, task: F) -> Uuid
    where
        F: Fn(u64) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let id = Uuid::new_v4();
        let run: TaskFn = Arc::new(move |count| -> TaskFuture { Box::pin(task(count)) });
        self.lock_tasks().insert(
            id,
            Task {
                interval: interval.max(1),
                run,
            },
        );
        id
    }

    /// Remove a task. Returns whether it was registered.
    pub fn unregister(&self, id: Uuid) -> bool {
        self.lock_tasks().remove(&id).is_some()
    }

    /// Advance one tick and spawn everything due on it.
    ///
    /// Must be called from within the scheduler.
    pub fn tick(&self) -> u64 {
        let count = self.count.fetch_add(1, Ordering::Relaxed) + 1;

        if self.settings.interval > 0 && count % self.settings.interval == 0 {
            tracing::info!(count, "Server heartbeat");
        }

        let due: Vec<TaskFn> = self
            .lock_tasks()
            .values()
            .filter(|task| count % task.interval == 0)
            .map(|task| task.run.clone())
            .collect();
        for run in due {
            tokio::spawn(run(count));
        }

        if let Some(broadcast) = &self.broadcast {
            if self.settings.broadcast > 0 && count % self.settings.broadcast == 0 {
                if broadcast.in_flight.swap(true, Ordering::AcqRel) {
                    tracing::debug!(count, "Previous heartbeat broadcast pending, skipping");
                } else {
                    let bus = broadcast.bus.clone();
                    let in_flight = broadcast.in_flight.clone();
                    let message = json!({ "server_id": broadcast.server_id, "count": count });
                    tokio::spawn(async move {
                        if let Err(e) = bus.publish("heartbeat", &message).await {
                            tracing::warn!(error = %e, "Failed to broadcast heartbeat");
                        }
                        in_flight.store(false, Ordering::Release);
                    });
                }
            }
        }

        count
    }

    /// Tick forever, once per [`TICK_INTERVAL`], starting immediately.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.tick();
        }
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Task>> {
        // A panicking task body never runs under this lock.
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for Heartbeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Heartbeat")
            .field("count", &self.count())
            .field("tasks", &self.lock_tasks().len())
            .field("broadcast", &self.broadcast.is_some())
            .finish()
    }
}
