//! HTTP server subsystem.
//!
//! # Data Flow
//! ```text
//! httpServer section
//!     → api registry (load modules → routes.rs RouteTable)
//!     → middleware registry (resolve chain)
//!     → server.rs (freeze router, bind, spawn axum::serve)
//! ```

pub mod middleware;
pub mod routes;
pub mod server;

pub use middleware::{MiddlewareChain, MiddlewareRegistry};
pub use routes::{RouteInfo, RouteTable};
pub use server::HttpServer;
