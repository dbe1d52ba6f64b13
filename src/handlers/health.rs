use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Liveness probe; also pings the database.
async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let database = match state.db.ping().await {
        Ok(()) => "up",
        Err(_) => "down",
    };
    Json(HealthStatus {
        status: "ok",
        database,
    })
}
