//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize subsystems in dependency order
//! - Schedule the heartbeat
//! - Run the scheduler until stopped
//!
//! # Data Flow
//! ```text
//! initialize():
//!     Load config → Scheduler → Logging → Database? → Event bus? (connect, bind)
//!                 → HTTP server? → Heartbeat (first tick after 500ms)
//!
//! start():
//!     Spawn stop trigger → block on scheduler until Stopped
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and nothing is retried
//! - Subsystems initialize in order, not concurrently
//! - Absent sections are skipped silently
//! - Stopping does not drain; suspended tasks die with the runtime

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Runtime;

use crate::api::ApiRegistry;
use crate::bus::{BusConnector, EventBus, TcpBusConnector};
use crate::config::{load_config, validation::validate_config, Config, ConfigError, ConfigStore, LogConfig};
use crate::db::{DatabaseConnector, DatabasePool, TcpDatabaseConnector};
use crate::error::{BootstrapError, BootstrapResult};
use crate::heartbeat::Heartbeat;
use crate::http::{HttpServer, MiddlewareRegistry};
use crate::lifecycle::scheduler::Scheduler;
use crate::lifecycle::shutdown::{Lifecycle, LifecycleState, StopHandle};
use crate::lifecycle::signals;
use crate::observability::logging::{self, LogGuard};

/// Delay before the first heartbeat tick.
pub const HEARTBEAT_DELAY: Duration = Duration::from_millis(500);

/// Collaborators the orchestrator resolves configuration against.
pub struct Components {
    /// APIs addressable from `httpServer.apis`.
    pub apis: ApiRegistry,
    /// Middlewares addressable from `httpServer.middlewares`.
    pub middlewares: MiddlewareRegistry,
    pub database: Arc<dyn DatabaseConnector>,
    pub event_bus: Arc<dyn BusConnector>,
}

impl Default for Components {
    fn default() -> Self {
        Self {
            apis: ApiRegistry::builtin(),
            middlewares: MiddlewareRegistry::builtin(),
            database: Arc::new(TcpDatabaseConnector),
            event_bus: Arc::new(TcpBusConnector),
        }
    }
}

/// Owns the scheduler and every subsystem handle of the process.
pub struct Orchestrator {
    components: Components,
    lifecycle: Lifecycle,
    bootstrapped: bool,
    config: Option<Arc<ConfigStore>>,
    database: Option<Arc<DatabasePool>>,
    event_bus: Option<Arc<EventBus>>,
    http_server: Option<HttpServer>,
    heartbeat: Option<Arc<Heartbeat>>,
    // Dropped after the handles above so their sockets close on a live reactor.
    scheduler: Scheduler,
    // Dropped last so shutdown logging still reaches the file sink.
    log_guard: Option<LogGuard>,
}

impl Orchestrator {
    pub fn new(components: Components) -> Self {
        Self {
            components,
            lifecycle: Lifecycle::new(),
            bootstrapped: false,
            config: None,
            database: None,
            event_bus: None,
            http_server: None,
            heartbeat: None,
            scheduler: Scheduler::new(),
            log_guard: None,
        }
    }

    /// Load configuration from `source` and bootstrap every configured subsystem.
    ///
    /// May only be called once.
    pub fn initialize(&mut self, source: impl AsRef<Path>) -> BootstrapResult<()> {
        self.lifecycle
            .transition("initialize", LifecycleState::Uninitialized, LifecycleState::Initializing)?;

        let config = load_config(source.as_ref())?;
        self.bootstrap(config)
    }

    /// Bootstrap from an already parsed configuration.
    pub fn initialize_with(&mut self, config: Config) -> BootstrapResult<()> {
        self.lifecycle
            .transition("initialize", LifecycleState::Uninitialized, LifecycleState::Initializing)?;

        validate_config(&config).map_err(ConfigError::Validation)?;
        self.bootstrap(config)
    }

    fn bootstrap(&mut self, config: Config) -> BootstrapResult<()> {
        let config = Arc::new(ConfigStore::new(config));
        self.config = Some(config.clone());

        let runtime = self.scheduler.runtime()?;

        let default_log = LogConfig::default();
        let log_settings = config.log.as_ref().unwrap_or(&default_log);
        self.log_guard = Some(logging::init(log_settings).map_err(BootstrapError::Logging)?);
        tracing::info!(
            console = log_settings.console,
            level = %log_settings.level,
            "Logging configured"
        );

        match &config.database {
            Some(settings) => {
                let pool = runtime.block_on(self.components.database.connect(settings))?;
                tracing::info!(endpoint = %pool.endpoint(), database = %pool.database(), "Database ready");
                self.database = Some(Arc::new(pool));
            }
            None => tracing::debug!("No database section, skipping"),
        }

        match &config.event_bus {
            Some(settings) => {
                let bus = Arc::new(runtime.block_on(self.components.event_bus.connect(settings))?);
                tracing::info!(endpoint = %bus.endpoint(), exchange = %bus.exchange(), "Event bus ready");

                config.bind_event_bus(&bus)?;
                self.event_bus = Some(bus);
            }
            None => tracing::debug!("No eventBus section, skipping"),
        }

        match &config.http_server {
            Some(settings) => {
                let server = HttpServer::bootstrap(
                    settings,
                    &self.components.apis,
                    &self.components.middlewares,
                    runtime,
                )?;
                self.http_server = Some(server);
            }
            None => tracing::debug!("No httpServer section, skipping"),
        }

        self.heartbeat = Some(schedule_heartbeat(&config, self.event_bus.as_ref(), runtime));

        self.bootstrapped = true;
        tracing::info!("Bootstrap complete");
        Ok(())
    }

    /// Run the scheduler until SIGINT or [`stop`](Self::stop).
    pub fn start(&self) -> BootstrapResult<()> {
        self.start_with_signal(signals::interrupt())
    }

    /// Run the scheduler until `trigger` resolves or [`stop`](Self::stop) is called.
    ///
    /// Blocks the calling thread.
    pub fn start_with_signal<F>(&self, trigger: F) -> BootstrapResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if !self.bootstrapped {
            return Err(BootstrapError::InvalidState {
                operation: "start",
                actual: self.state(),
            });
        }
        let runtime = self.scheduler.runtime()?;
        self.lifecycle
            .transition("start", LifecycleState::Initializing, LifecycleState::Running)?;

        let stop = self.stop_handle();
        runtime.spawn(async move {
            trigger.await;
            stop.stop();
        });

        tracing::info!("Scheduler loop started");
        runtime.block_on(self.lifecycle.stopped());
        tracing::info!("Scheduler loop stopped");
        Ok(())
    }

    /// Halt the scheduler. No-op unless running.
    pub fn stop(&self) {
        self.stop_handle().stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle::new(self.lifecycle.clone())
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// The loaded configuration, once loading has succeeded.
    pub fn config(&self) -> Option<&Arc<ConfigStore>> {
        self.config.as_ref()
    }

    pub fn database(&self) -> Option<&Arc<DatabasePool>> {
        self.database.as_ref()
    }

    pub fn event_bus(&self) -> Option<&Arc<EventBus>> {
        self.event_bus.as_ref()
    }

    pub fn http_server(&self) -> Option<&HttpServer> {
        self.http_server.as_ref()
    }

    pub fn heartbeat(&self) -> Option<&Arc<Heartbeat>> {
        self.heartbeat.as_ref()
    }

    /// The scheduler runtime, created on first access.
    pub fn scheduler(&self) -> BootstrapResult<&Runtime> {
        self.scheduler.runtime()
    }

    /// Whether the scheduler runtime exists yet.
    pub fn scheduler_created(&self) -> bool {
        self.scheduler.is_created()
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("state", &self.state())
            .field("database", &self.database.is_some())
            .field("event_bus", &self.event_bus.is_some())
            .field("http_server", &self.http_server.as_ref().map(HttpServer::local_addr))
            .field("scheduler_created", &self.scheduler_created())
            .finish()
    }
}

fn schedule_heartbeat(config: &ConfigStore, bus: Option<&Arc<EventBus>>, runtime: &Runtime) -> Arc<Heartbeat> {
    let mut heartbeat = Heartbeat::new(config.heartbeat.clone().unwrap_or_default());
    if let (Some(bus), Some(binding)) = (bus, config.bus_binding()) {
        heartbeat = heartbeat.with_event_bus(bus.clone(), binding.server_id.clone());
    }
    let heartbeat = Arc::new(heartbeat);

    let ticker = heartbeat.clone();
    runtime.spawn(async move {
        tokio::time::sleep(HEARTBEAT_DELAY).await;
        ticker.run().await;
    });
    tracing::debug!(delay_ms = HEARTBEAT_DELAY.as_millis() as u64, "Heartbeat scheduled");

    heartbeat
}
