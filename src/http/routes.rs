//! Route table accumulated by API modules.
//!
//! # Responsibilities
//! - Collect `(method, path, handler)` entries in registration order
//! - Reject duplicate `(method, path)` pairs (first registration wins)
//! - Freeze into an axum `Router` once every API is loaded, reporting paths
//!   the router refuses (conflicting captures, `:name` segments) as errors
//!
//! # Design Decisions
//! - Insertion order is kept for diagnostics only; dispatch is axum's
//! - Entries registered on the same path with different methods are merged

use std::panic::{self, AssertUnwindSafe};

use axum::handler::Handler;
use axum::http::Method;
use axum::routing::{on, MethodFilter, MethodRouter};
use axum::Router;

use crate::error::ResolutionError;

/// Diagnostic view of one registered route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub method: Method,
    pub path: String,
    /// Type name of the handler function.
    pub handler: &'static str,
}

struct RouteEntry {
    info: RouteInfo,
    route: MethodRouter,
}

/// Ordered, de-duplicated set of routes.
#[derive(Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<H, T>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add(Method::GET, MethodFilter::GET, path, handler)
    }

    pub fn post<H, T>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add(Method::POST, MethodFilter::POST, path, handler)
    }

    pub fn put<H, T>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add(Method::PUT, MethodFilter::PUT, path, handler)
    }

    pub fn delete<H, T>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add(Method::DELETE, MethodFilter::DELETE, path, handler)
    }

    fn add<H, T>(&mut self, method: Method, filter: MethodFilter, path: &str, handler: H) -> &mut Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        if !path.starts_with('/') {
            tracing::warn!(method = %method, path, "Ignoring route without leading '/'");
            return self;
        }
        if self.contains(&method, path) {
            tracing::warn!(method = %method, path, "Ignoring duplicate route");
            return self;
        }

        self.entries.push(RouteEntry {
            info: RouteInfo {
                method,
                path: path.to_string(),
                handler: std::any::type_name::<H>(),
            },
            route: on(filter, handler),
        });
        self
    }

    pub fn contains(&self, method: &Method, path: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.info.method == *method && e.info.path == path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered routes, in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteInfo> {
        self.entries.iter().map(|e| &e.info)
    }

    /// Build the router. Routes added after this point are never served.
    ///
    /// Fails on the first path axum rejects.
    pub fn freeze(self) -> Result<(Router, Vec<RouteInfo>), ResolutionError> {
        let mut router = Router::new();
        let mut infos = Vec::with_capacity(self.entries.len());
        for entry in self.entries {
            let RouteEntry { info, route } = entry;
            // axum reports invalid or conflicting paths by panicking.
            router = panic::catch_unwind(AssertUnwindSafe(|| router.route(&info.path, route)))
                .map_err(|payload| ResolutionError::InvalidRoute {
                    path: info.path.clone(),
                    reason: panic_reason(payload.as_ref()),
                })?;
            infos.push(info);
        }
        Ok((router, infos))
    }
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(reason) = payload.downcast_ref::<&str>() {
        reason.to_string()
    } else if let Some(reason) = payload.downcast_ref::<String>() {
        reason.clone()
    } else {
        "rejected by router".to_string()
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.routes()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn first() -> &'static str {
        "first"
    }

    async fn second() -> &'static str {
        "second"
    }

    #[test]
    fn test_keeps_insertion_order() {
        let mut table = RouteTable::new();
        table.get("/b", first).post("/a", second).delete("/b", second);

        let routes: Vec<_> = table
            .routes()
            .map(|r| (r.method.clone(), r.path.as_str()))
            .collect();
        assert_eq!(
            routes,
            vec![(Method::GET, "/b"), (Method::POST, "/a"), (Method::DELETE, "/b")]
        );
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut table = RouteTable::new();
        table.get("/ping", first);
        table.get("/ping", second);

        assert_eq!(table.len(), 1);
        let handler = table.routes().next().unwrap().handler;
        assert!(handler.ends_with("first"));
    }

    #[test]
    fn test_rejects_relative_path() {
        let mut table = RouteTable::new();
        table.put("ping", first);
        assert!(table.is_empty());
    }

    #[test]
    fn test_freeze_merges_methods_on_same_path() {
        let mut table = RouteTable::new();
        table.get("/orders", first).post("/orders", second);

        let (_router, infos) = table.freeze().unwrap();
        assert_eq!(infos.len(), 2);
    }

    #[test]
    fn test_freeze_rejects_colon_capture() {
        let mut table = RouteTable::new();
        table.get("/orders/:id", first);

        let err = table.freeze().unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidRoute { ref path, .. } if path == "/orders/:id"));
    }
}
