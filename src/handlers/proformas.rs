use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};

use crate::auth::AuthenticatedUser;
use crate::entities::proforma;
use crate::errors::ServiceError;
use crate::handlers::pdf_response;
use crate::services::invoices::InvoiceDetail;
use crate::services::proformas::{
    CreateProformaInput, ProformaDetail, ProformaFilter, ProformaStats, UpdateProformaInput,
};
use crate::services::{Page, Pagination};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/stats", get(stats))
        .route("/:id", get(get_one).put(update).delete(delete))
        .route("/:id/mark_sent", post(mark_sent))
        .route("/:id/accept", post(accept))
        .route("/:id/reject", post(reject))
        .route("/:id/convert_to_invoice", post(convert_to_invoice))
        .route("/:id/pdf", get(pdf))
}

async fn create(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateProformaInput>,
) -> Result<(StatusCode, Json<ProformaDetail>), ServiceError> {
    let created = state.proformas.create(user.id, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(filter): Query<ProformaFilter>,
    Query(page): Query<Pagination>,
) -> Result<Json<Page<proforma::Model>>, ServiceError> {
    Ok(Json(state.proformas.list(filter, page.clamped()).await?))
}

async fn stats(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<ProformaStats>, ServiceError> {
    Ok(Json(state.proformas.stats().await?))
}

async fn get_one(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<ProformaDetail>, ServiceError> {
    Ok(Json(state.proformas.get(id).await?))
}

async fn update(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProformaInput>,
) -> Result<Json<ProformaDetail>, ServiceError> {
    Ok(Json(state.proformas.update(id, body).await?))
}

async fn delete(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state.proformas.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_sent(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<proforma::Model>, ServiceError> {
    Ok(Json(state.proformas.mark_sent(id).await?))
}

async fn accept(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<proforma::Model>, ServiceError> {
    Ok(Json(state.proformas.accept(id).await?))
}

async fn reject(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<proforma::Model>, ServiceError> {
    Ok(Json(state.proformas.reject(id).await?))
}

async fn convert_to_invoice(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<InvoiceDetail>), ServiceError> {
    let created = state.proformas.convert_to_invoice(id, user.id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn pdf(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let detail = state.proformas.get(id).await?;
    let bytes = state.pdf.proforma_pdf(&detail).await?;
    Ok(pdf_response(&detail.proforma.number, bytes))
}
