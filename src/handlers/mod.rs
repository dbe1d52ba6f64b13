//! HTTP surface. One router per resource, nested under `/api/v1` (bearer
//! authenticated via the [`crate::auth::AuthenticatedUser`] extractor) and
//! `/auth` for token endpoints.

pub mod auth;
pub mod clients;
pub mod delivery_notes;
pub mod health;
pub mod invoices;
pub mod products;
pub mod proformas;
pub mod users;

use axum::http::header;
use axum::response::{IntoResponse, Response};

/// PDF download response named `{number}.pdf`.
pub(crate) fn pdf_response(number: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{number}.pdf\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
