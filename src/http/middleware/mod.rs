//! Middleware registry and chain.
//!
//! # Data Flow
//! ```text
//! httpServer.middlewares = ["quant.middlewares.trace", ...]
//!     → MiddlewareRegistry::resolve_chain (module.attribute lookup)
//!     → MiddlewareChain (configured order)
//!     → MiddlewareChain::apply(Router)
//! ```
//!
//! # Design Decisions
//! - References resolve against an explicit table, never at runtime by name
//! - Any unresolved reference is fatal
//! - The first configured middleware is the outermost layer: it sees the
//!   request first and the response last

pub mod builtin;

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;

use crate::error::ResolutionError;

/// A middleware wraps a router in one or more layers.
pub type Middleware = Arc<dyn Fn(Router) -> Router + Send + Sync>;

/// `module → attribute → middleware` lookup table.
#[derive(Clone, Default)]
pub struct MiddlewareRegistry {
    modules: HashMap<String, HashMap<String, Middleware>>,
}

impl MiddlewareRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the `quant.middlewares` built-ins.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Add or replace `module.attribute`.
    pub fn register<F>(&mut self, module: &str, attribute: &str, middleware: F) -> &mut Self
    where
        F: Fn(Router) -> Router + Send + Sync + 'static,
    {
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(attribute.to_string(), Arc::new(middleware));
        self
    }

    /// Resolve one dotted reference. The last segment is the attribute.
    pub fn resolve(&self, reference: &str) -> Result<Middleware, ResolutionError> {
        let (module, attribute) = reference
            .rsplit_once('.')
            .filter(|(m, a)| !m.is_empty() && !a.is_empty())
            .ok_or_else(|| ResolutionError::MalformedReference(reference.to_string()))?;

        let attributes = self
            .modules
            .get(module)
            .ok_or_else(|| ResolutionError::UnknownModule {
                reference: reference.to_string(),
                module: module.to_string(),
            })?;

        attributes
            .get(attribute)
            .cloned()
            .ok_or_else(|| ResolutionError::MissingAttribute {
                module: module.to_string(),
                attribute: attribute.to_string(),
            })
    }

    /// Resolve every reference, keeping the configured order.
    pub fn resolve_chain<S: AsRef<str>>(&self, references: &[S]) -> Result<MiddlewareChain, ResolutionError> {
        let mut links = Vec::with_capacity(references.len());
        for reference in references {
            let reference = reference.as_ref();
            links.push((reference.to_string(), self.resolve(reference)?));
        }
        Ok(MiddlewareChain { links })
    }
}

impl std::fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self
            .modules
            .iter()
            .flat_map(|(module, attrs)| attrs.keys().map(move |a| format!("{}.{}", module, a)))
            .collect();
        names.sort();
        f.debug_struct("MiddlewareRegistry").field("middlewares", &names).finish()
    }
}

/// Resolved middlewares in configured order.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    links: Vec<(String, Middleware)>,
}

impl MiddlewareChain {
    /// Wrap `router` so the first link ends up outermost.
    pub fn apply(&self, router: Router) -> Router {
        // axum's last layer is the outermost one.
        self.links
            .iter()
            .rev()
            .fold(router, |router, (_, middleware)| middleware(router))
    }

    /// References in configured order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
