//! API modules and their registry.
//!
//! An API module is a unit that adds routes to the shared [`RouteTable`].
//! Modules are looked up by name from an explicitly populated
//! [`ApiRegistry`]; the names come from `httpServer.apis`.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ResolutionError;
use crate::http::RouteTable;

/// A unit of HTTP routes.
pub trait ApiModule: Send + Sync {
    fn register(&self, routes: &mut RouteTable);
}

impl<F> ApiModule for F
where
    F: Fn(&mut RouteTable) + Send + Sync,
{
    fn register(&self, routes: &mut RouteTable) {
        self(routes)
    }
}

/// Name → API module lookup table.
#[derive(Clone, Default)]
pub struct ApiRegistry {
    modules: HashMap<String, Arc<dyn ApiModule>>,
}

impl ApiRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in APIs (`pingApi`, `statusApi`).
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("pingApi", handlers::PingApi);
        registry.register("statusApi", handlers::StatusApi);
        registry
    }

    /// Add or replace a module under `name`.
    pub fn register(&mut self, name: impl Into<String>, module: impl ApiModule + 'static) -> &mut Self {
        self.modules.insert(name.into(), Arc::new(module));
        self
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn ApiModule>, ResolutionError> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| ResolutionError::UnknownApi(name.to_string()))
    }

    /// Load the named modules in order into a fresh route table.
    ///
    /// A name listed more than once is loaded only the first time. Every
    /// name is resolved before any module registers routes.
    pub fn load<S: AsRef<str>>(&self, names: &[S]) -> Result<RouteTable, ResolutionError> {
        let mut modules: Vec<(&str, Arc<dyn ApiModule>)> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if modules.iter().any(|(loaded, _)| *loaded == name) {
                tracing::debug!(api = name, "API already loaded, skipping");
                continue;
            }
            modules.push((name, self.get(name)?));
        }

        let mut routes = RouteTable::new();
        for (name, module) in modules {
            let before = routes.len();
            module.register(&mut routes);
            tracing::debug!(api = name, routes = routes.len() - before, "API loaded");
        }
        Ok(routes)
    }
}

impl std::fmt::Debug for ApiRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.modules.keys().collect();
        names.sort();
        f.debug_struct("ApiRegistry").field("modules", &names).finish()
    }
}
