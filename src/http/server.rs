//! HTTP server bootstrap.
//!
//! # Responsibilities
//! - Load configured API modules into the route table
//! - Resolve the configured middleware chain
//! - Freeze routes into an Axum router and wrap it in the chain
//! - Bind the listener and spawn the accept loop on the scheduler
//!
//! Steps run in that order; a resolution failure aborts before a socket is
//! opened.

use std::net::SocketAddr;

use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

use crate::api::ApiRegistry;
use crate::config::{ConfigError, HttpServerConfig, ValidationError};
use crate::error::BootstrapError;
use crate::http::middleware::MiddlewareRegistry;
use crate::http::routes::RouteInfo;
use crate::net::listener;

/// A bound, serving HTTP server.
#[derive(Debug)]
pub struct HttpServer {
    local_addr: SocketAddr,
    routes: Vec<RouteInfo>,
    middlewares: Vec<String>,
    task: JoinHandle<()>,
}

impl HttpServer {
    /// Assemble, bind and start the server on `runtime`.
    ///
    /// Blocks the caller until the socket is bound. Connections are accepted
    /// whenever the runtime is driven.
    pub fn bootstrap(
        settings: &HttpServerConfig,
        apis: &ApiRegistry,
        middlewares: &MiddlewareRegistry,
        runtime: &Runtime,
    ) -> Result<Self, BootstrapError> {
        let port = settings.port.ok_or_else(|| {
            ConfigError::Validation(vec![ValidationError::new("httpServer.port", "is required")])
        })?;

        let routes = apis.load(&settings.apis)?;
        let chain = middlewares.resolve_chain(&settings.middlewares)?;

        let (router, routes) = routes.freeze()?;
        for route in &routes {
            tracing::info!(
                path = %route.path,
                method = %route.method,
                handler = route.handler,
                "Registered API"
            );
        }
        let router = chain.apply(router);

        let (listener, local_addr) = runtime.block_on(listener::bind(&settings.host, port))?;

        let task = runtime.spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!(error = %e, "HTTP server stopped with error");
            }
        });

        tracing::info!(
            address = %local_addr,
            host = %settings.host,
            port,
            "HTTP server listening"
        );

        Ok(Self {
            local_addr,
            routes,
            middlewares: chain.names().map(str::to_string).collect(),
            task,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The frozen route table, in registration order.
    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    /// Middleware references, outermost first.
    pub fn middlewares(&self) -> &[String] {
        &self.middlewares
    }

    /// Whether the accept loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
