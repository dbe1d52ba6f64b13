use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};

use crate::auth::AuthenticatedUser;
use crate::entities::delivery_note;
use crate::errors::ServiceError;
use crate::handlers::pdf_response;
use crate::services::delivery_notes::{
    CreateDeliveryNoteInput, DeliveryNoteDetail, DeliveryNoteFilter, UpdateDeliveryNoteInput,
};
use crate::services::{Page, Pagination};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(delete))
        .route("/:id/pdf", get(pdf))
}

async fn create(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateDeliveryNoteInput>,
) -> Result<(StatusCode, Json<DeliveryNoteDetail>), ServiceError> {
    let created = state.delivery_notes.create(user.id, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(filter): Query<DeliveryNoteFilter>,
    Query(page): Query<Pagination>,
) -> Result<Json<Page<delivery_note::Model>>, ServiceError> {
    Ok(Json(
        state.delivery_notes.list(filter, page.clamped()).await?,
    ))
}

async fn get_one(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<DeliveryNoteDetail>, ServiceError> {
    Ok(Json(state.delivery_notes.get(id).await?))
}

async fn update(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateDeliveryNoteInput>,
) -> Result<Json<DeliveryNoteDetail>, ServiceError> {
    Ok(Json(state.delivery_notes.update(id, body).await?))
}

async fn delete(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state.delivery_notes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn pdf(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let detail = state.delivery_notes.get(id).await?;
    let bytes = state.pdf.delivery_note_pdf(&detail).await?;
    Ok(pdf_response(&detail.delivery_note.number, bytes))
}
