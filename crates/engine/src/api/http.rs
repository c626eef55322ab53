//! HTTP routes.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use tablerelay_shared::{MIN_CLIENT_VERSION, SERVER_VERSION};

use crate::app::App;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    server_version: &'static str,
    min_client_version: &'static str,
    sessions: usize,
}

async fn health(State(app): State<Arc<App>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        server_version: SERVER_VERSION,
        min_client_version: MIN_CLIENT_VERSION,
        sessions: app.session_count().await,
    })
}
