use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};

use crate::auth::AuthenticatedUser;
use crate::entities::invoice;
use crate::errors::ServiceError;
use crate::handlers::pdf_response;
use crate::services::invoices::{
    CreateInvoiceInput, InvoiceDashboard, InvoiceDetail, InvoiceFilter, UpdateInvoiceInput,
};
use crate::services::{Page, Pagination};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/dashboard", get(dashboard))
        .route("/:id", get(get_one).put(update).delete(delete))
        .route("/:id/finalize", post(finalize))
        .route("/:id/mark_paid", post(mark_paid))
        .route("/:id/cancel", post(cancel))
        .route("/:id/pdf", get(pdf))
}

async fn create(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateInvoiceInput>,
) -> Result<(StatusCode, Json<InvoiceDetail>), ServiceError> {
    let created = state.invoices.create(user.id, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(filter): Query<InvoiceFilter>,
    Query(page): Query<Pagination>,
) -> Result<Json<Page<invoice::Model>>, ServiceError> {
    Ok(Json(state.invoices.list(filter, page.clamped()).await?))
}

async fn dashboard(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<InvoiceDashboard>, ServiceError> {
    Ok(Json(state.invoices.dashboard().await?))
}

async fn get_one(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<InvoiceDetail>, ServiceError> {
    Ok(Json(state.invoices.get(id).await?))
}

async fn update(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateInvoiceInput>,
) -> Result<Json<InvoiceDetail>, ServiceError> {
    Ok(Json(state.invoices.update(id, body).await?))
}

async fn delete(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state.invoices.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn finalize(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<invoice::Model>, ServiceError> {
    Ok(Json(state.invoices.finalize(id).await?))
}

async fn mark_paid(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<invoice::Model>, ServiceError> {
    Ok(Json(state.invoices.mark_paid(id).await?))
}

async fn cancel(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<invoice::Model>, ServiceError> {
    Ok(Json(state.invoices.cancel(id).await?))
}

async fn pdf(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let detail = state.invoices.get(id).await?;
    let bytes = state.pdf.invoice_pdf(&detail).await?;
    Ok(pdf_response(&detail.invoice.number, bytes))
}
