use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::auth::AuthenticatedUser;
use crate::entities::user;
use crate::errors::ServiceError;
use crate::services::users::{
    ChangePasswordInput, CreateUserInput, ResetPasswordInput, UpdateUserInput,
};
use crate::services::{Page, Pagination};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/me", get(me))
        .route("/me/password", post(change_my_password))
        .route("/:id", get(get_one).put(update).delete(delete))
        .route("/:id/password", post(reset_password))
}

async fn create(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateUserInput>,
) -> Result<(StatusCode, Json<user::Model>), ServiceError> {
    user.require_admin()?;
    let created = state.users.create(body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(page): Query<Pagination>,
) -> Result<Json<Page<user::Model>>, ServiceError> {
    user.require_admin()?;
    Ok(Json(state.users.list(page.clamped()).await?))
}

async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<user::Model>, ServiceError> {
    Ok(Json(state.users.get(user.id).await?))
}

async fn change_my_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<ChangePasswordInput>,
) -> Result<StatusCode, ServiceError> {
    state.users.change_password(user.id, body).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_one(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<user::Model>, ServiceError> {
    user.require_admin()?;
    Ok(Json(state.users.get(id).await?))
}

async fn update(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUserInput>,
) -> Result<Json<user::Model>, ServiceError> {
    user.require_admin()?;
    Ok(Json(state.users.update(id, body).await?))
}

async fn delete(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    user.require_admin()?;
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reset_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<ResetPasswordInput>,
) -> Result<StatusCode, ServiceError> {
    user.require_admin()?;
    state.users.reset_password(id, body).await?;
    Ok(StatusCode::NO_CONTENT)
}
