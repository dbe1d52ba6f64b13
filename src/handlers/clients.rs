use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::entities::client;
use crate::errors::ServiceError;
use crate::services::clients::{CreateClientInput, UpdateClientInput};
use crate::services::{Page, Pagination};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ClientListQuery {
    pub search: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(delete))
}

async fn create(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(body): Json<CreateClientInput>,
) -> Result<(StatusCode, Json<client::Model>), ServiceError> {
    let created = state.clients.create(body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ClientListQuery>,
    Query(page): Query<Pagination>,
) -> Result<Json<Page<client::Model>>, ServiceError> {
    let page = state
        .clients
        .list(query.search.as_deref(), page.clamped())
        .await?;
    Ok(Json(page))
}

async fn get_one(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<client::Model>, ServiceError> {
    Ok(Json(state.clients.get(id).await?))
}

async fn update(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateClientInput>,
) -> Result<Json<client::Model>, ServiceError> {
    Ok(Json(state.clients.update(id, body).await?))
}

async fn delete(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state.clients.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
