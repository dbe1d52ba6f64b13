use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use crate::auth::TokenPair;
use crate::errors::ServiceError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenPair>, ServiceError> {
    let pair = state.auth.login(&body.username, &body.password).await?;
    Ok(Json(pair))
}

async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, ServiceError> {
    let pair = state.auth.refresh(&body.refresh_token).await?;
    Ok(Json(pair))
}
