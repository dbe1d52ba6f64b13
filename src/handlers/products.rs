use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::entities::product;
use crate::errors::ServiceError;
use crate::services::products::{CreateProductInput, UpdateProductInput};
use crate::services::{Page, Pagination};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
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
    Json(body): Json<CreateProductInput>,
) -> Result<(StatusCode, Json<product::Model>), ServiceError> {
    let created = state.products.create(body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ProductListQuery>,
    Query(page): Query<Pagination>,
) -> Result<Json<Page<product::Model>>, ServiceError> {
    let page = state
        .products
        .list(query.search.as_deref(), page.clamped())
        .await?;
    Ok(Json(page))
}

async fn get_one(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<product::Model>, ServiceError> {
    Ok(Json(state.products.get(id).await?))
}

async fn update(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProductInput>,
) -> Result<Json<product::Model>, ServiceError> {
    Ok(Json(state.products.update(id, body).await?))
}

async fn delete(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
