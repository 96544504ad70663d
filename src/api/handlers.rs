//! Built-in diagnostic APIs.

use axum::Json;
use serde::Serialize;

use crate::api::ApiModule;
use crate::http::RouteTable;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn ping() -> &'static str {
    "pong"
}

pub async fn get_status() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

/// `GET /ping` → `pong`.
#[derive(Debug, Clone, Copy)]
pub struct PingApi;

impl ApiModule for PingApi {
    fn register(&self, routes: &mut RouteTable) {
        routes.get("/ping", ping);
    }
}

/// `GET /status` → version and status as JSON.
#[derive(Debug, Clone, Copy)]
pub struct StatusApi;

impl ApiModule for StatusApi {
    fn register(&self, routes: &mut RouteTable) {
        routes.get("/status", get_status);
    }
}
