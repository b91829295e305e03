//! API module
//!
//! Contains HTTP request handlers for the agent dashboard and the
//! document translator, and the router that wires them together.

pub mod agents;
pub mod translate;

use crate::config::Config;
use crate::state::SharedState;
use crate::translation::Translator;
use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// State shared by every handler
#[derive(Clone)]
pub struct ApiState {
    /// Agent registry
    pub agents: SharedState,
    /// Translation service used by the document pipeline
    pub translator: Arc<dyn Translator>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl FromRef<ApiState> for SharedState {
    fn from_ref(api: &ApiState) -> Self {
        api.agents.clone()
    }
}

#[derive(Serialize)]
struct HelloResponse {
    message: String,
    status: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    message: String,
}

/// Build the application router
pub fn router(api: ApiState) -> Router {
    let max_upload_bytes = api.config.server.max_upload_bytes;

    Router::new()
        // Health check and hello world
        .route("/", get(hello_world))
        .route("/api/health", get(health_check))
        // Agent dashboard API
        .route("/api/agents", get(agents::list_agents))
        .route("/api/agents/:name", get(agents::get_agent))
        .route("/api/agents/:name/logs", get(agents::get_agent_logs))
        .route("/api/agents/:name/start", post(agents::start_agent))
        .route("/api/agents/:name/stop", post(agents::stop_agent))
        // Document translation API
        .route("/api/languages", get(translate::list_languages))
        .route(
            "/api/translate",
            post(translate::translate).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(api)
}

async fn hello_world() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello from Agent Dashboard Backend!".to_string(),
        status: "ok".to_string(),
    })
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Backend is healthy".to_string(),
    })
}
