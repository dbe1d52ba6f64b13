mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{expect_json, TestApp};

async fn create_proforma(app: &TestApp, client_id: i64) -> Value {
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/proformas/",
            Some(json!({
                "client_id": client_id,
                "notes": "Valid 30 days",
                "items": [
                    { "description": "Cement bag", "quantity": "3", "unit_price": "1000", "tax_rate": "18" },
                    { "description": "Rebar", "quantity": "2", "unit_price": "1000", "tax_rate": "18" }
                ]
            })),
        )
        .await;
    expect_json(response, StatusCode::CREATED).await
}

#[tokio::test]
async fn quote_workflow_follows_the_transition_table() {
    let app = TestApp::new().await;
    let client = app.seed_client("Quote Client").await;
    let proforma = create_proforma(&app, client.id).await;
    let id = proforma["id"].as_i64().unwrap();
    assert_eq!(proforma["status"], "draft");

    // accept requires sent first
    let early_accept = app
        .request_authenticated(Method::POST, &format!("/api/v1/proformas/{id}/accept"), None)
        .await;
    assert_eq!(early_accept.status(), StatusCode::CONFLICT);

    let sent = app
        .request_authenticated(Method::POST, &format!("/api/v1/proformas/{id}/mark_sent"), None)
        .await;
    let sent = expect_json(sent, StatusCode::OK).await;
    assert_eq!(sent["status"], "sent");

    let accepted = app
        .request_authenticated(Method::POST, &format!("/api/v1/proformas/{id}/accept"), None)
        .await;
    let accepted = expect_json(accepted, StatusCode::OK).await;
    assert_eq!(accepted["status"], "accepted");

    let rejected = app
        .request_authenticated(Method::POST, &format!("/api/v1/proformas/{id}/reject"), None)
        .await;
    assert_eq!(rejected.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn conversion_copies_items_and_flips_the_status_once() {
    let app = TestApp::new().await;
    let client = app.seed_client("Conversion Client").await;
    let proforma = create_proforma(&app, client.id).await;
    let id = proforma["id"].as_i64().unwrap();

    let converted = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/proformas/{id}/convert_to_invoice"),
            None,
        )
        .await;
    let invoice = expect_json(converted, StatusCode::CREATED).await;

    assert_eq!(invoice["number"], "FAC-2025-001");
    assert_eq!(invoice["status"], "draft");
    assert_eq!(invoice["client_id"], client.id);
    assert_eq!(invoice["items"].as_array().unwrap().len(), 2);
    assert_eq!(invoice["total_with_tax"], proforma["total_with_tax"]);
    let notes = invoice["notes"].as_str().unwrap();
    assert!(notes.starts_with("Converted from proforma PRO-2025-001"));
    assert!(notes.contains("Valid 30 days"));

    let source = app
        .request_authenticated(Method::GET, &format!("/api/v1/proformas/{id}"), None)
        .await;
    let source = expect_json(source, StatusCode::OK).await;
    assert_eq!(source["status"], "converted");

    // Second conversion conflicts and creates no invoice.
    let again = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/proformas/{id}/convert_to_invoice"),
            None,
        )
        .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let invoices = app
        .request_authenticated(Method::GET, "/api/v1/invoices/", None)
        .await;
    let invoices = expect_json(invoices, StatusCode::OK).await;
    assert_eq!(invoices["total"], 1);
}

#[tokio::test]
async fn conversion_is_allowed_from_any_non_converted_status() {
    let app = TestApp::new().await;
    let client = app.seed_client("Rejected Quote Client").await;
    let proforma = create_proforma(&app, client.id).await;
    let id = proforma["id"].as_i64().unwrap();

    app.request_authenticated(Method::POST, &format!("/api/v1/proformas/{id}/mark_sent"), None)
        .await;
    app.request_authenticated(Method::POST, &format!("/api/v1/proformas/{id}/reject"), None)
        .await;

    let converted = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/proformas/{id}/convert_to_invoice"),
            None,
        )
        .await;
    assert_eq!(converted.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn stats_count_the_current_month_pipeline() {
    let app = TestApp::new().await;
    let client = app.seed_client("Stats Client").await;

    let accepted = create_proforma(&app, client.id).await;
    let accepted_id = accepted["id"].as_i64().unwrap();
    app.request_authenticated(
        Method::POST,
        &format!("/api/v1/proformas/{accepted_id}/mark_sent"),
        None,
    )
    .await;
    app.request_authenticated(
        Method::POST,
        &format!("/api/v1/proformas/{accepted_id}/accept"),
        None,
    )
    .await;

    let converted = create_proforma(&app, client.id).await;
    let converted_id = converted["id"].as_i64().unwrap();
    app.request_authenticated(
        Method::POST,
        &format!("/api/v1/proformas/{converted_id}/convert_to_invoice"),
        None,
    )
    .await;

    create_proforma(&app, client.id).await;

    let stats = app
        .request_authenticated(Method::GET, "/api/v1/proformas/stats", None)
        .await;
    let stats = expect_json(stats, StatusCode::OK).await;

    assert_eq!(stats["month"], "2025-03");
    assert_eq!(stats["proforma_count"], 3);
    assert_eq!(stats["accepted_count"], 1);
    assert_eq!(stats["converted_count"], 1);
    assert_eq!(stats["pending_count"], 1);
}
