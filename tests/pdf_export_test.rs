mod common;

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use common::{expect_json, TestApp};

async fn seed_invoice(app: &TestApp) -> i64 {
    let client = app.seed_client("PDF Client").await;
    let created = app
        .request_authenticated(
            Method::POST,
            "/api/v1/invoices/",
            Some(json!({
                "client_id": client.id,
                "items": [
                    { "description": "Cement bag", "quantity": "3", "unit_price": "1000", "tax_rate": "18" }
                ]
            })),
        )
        .await;
    let body = expect_json(created, StatusCode::CREATED).await;
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn pdf_downloads_carry_the_document_number_as_filename() {
    let app = TestApp::new().await;
    let id = seed_invoice(&app).await;

    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/invoices/{id}/pdf"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert_eq!(content_type, "application/pdf");

    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert_eq!(
        disposition,
        "attachment; filename=\"FAC-2025-001.pdf\""
    );
}

#[tokio::test]
async fn a_failed_render_is_an_error_not_an_empty_success() {
    let app = TestApp::with_failing_renderer().await;
    let id = seed_invoice(&app).await;

    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/invoices/{id}/pdf"), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn proformas_and_delivery_notes_export_too() {
    let app = TestApp::new().await;
    let client = app.seed_client("Export Client").await;

    let proforma = app
        .request_authenticated(
            Method::POST,
            "/api/v1/proformas/",
            Some(json!({
                "client_id": client.id,
                "items": [ { "description": "Line", "quantity": "1", "unit_price": "100", "tax_rate": "0" } ]
            })),
        )
        .await;
    let proforma = expect_json(proforma, StatusCode::CREATED).await;
    let proforma_id = proforma["id"].as_i64().unwrap();

    let response = app
        .request_authenticated(
            Method::GET,
            &format!("/api/v1/proformas/{proforma_id}/pdf"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let delivery = app
        .request_authenticated(
            Method::POST,
            "/api/v1/delivery-notes/",
            Some(json!({
                "client_id": client.id,
                "items": [ { "description": "Line", "quantity": "1" } ]
            })),
        )
        .await;
    let delivery = expect_json(delivery, StatusCode::CREATED).await;
    let delivery_id = delivery["id"].as_i64().unwrap();

    let response = app
        .request_authenticated(
            Method::GET,
            &format!("/api/v1/delivery-notes/{delivery_id}/pdf"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}
