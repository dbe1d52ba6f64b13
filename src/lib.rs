//! gescom-api: business-management backend for a distribution company.
//!
//! Clients, a product catalog and three document types (invoices,
//! proformas, delivery notes) with line items, cached totals, year-scoped
//! sequential numbering, PDF export and JWT authentication.

use std::sync::Arc;

use axum::Router;

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod services;

use auth::{AuthConfig, AuthService};
use config::AppConfig;
use db::DbPool;
use services::pdf::PdfRenderer;
use services::{
    Clock, ClientService, DeliveryNoteService, DocumentPdfService, InvoiceService, ProductService,
    ProformaService, UserService,
};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub auth: Arc<AuthService>,
    pub clients: ClientService,
    pub products: ProductService,
    pub invoices: InvoiceService,
    pub proformas: ProformaService,
    pub delivery_notes: DeliveryNoteService,
    pub users: UserService,
    pub pdf: DocumentPdfService,
}

impl AppState {
    /// Wire every service against one connection pool. The clock and PDF
    /// renderer are injected so tests can pin time and stub rendering.
    pub fn new(
        db: Arc<DbPool>,
        config: AppConfig,
        clock: Arc<dyn Clock>,
        renderer: Arc<dyn PdfRenderer>,
    ) -> Self {
        let auth = Arc::new(AuthService::new(
            AuthConfig {
                jwt_secret: config.jwt_secret.clone(),
                access_token_expiration: std::time::Duration::from_secs(config.jwt_expiration),
                refresh_token_expiration: std::time::Duration::from_secs(
                    config.refresh_token_expiration,
                ),
            },
            db.clone(),
        ));

        Self {
            clients: ClientService::new(db.clone()),
            products: ProductService::new(db.clone(), config.clone()),
            invoices: InvoiceService::new(db.clone(), config.clone(), clock.clone()),
            proformas: ProformaService::new(db.clone(), config.clone(), clock.clone()),
            delivery_notes: DeliveryNoteService::new(db.clone(), clock),
            users: UserService::new(db.clone()),
            pdf: DocumentPdfService::new(renderer, config.company.clone()),
            auth,
            config,
            db,
        }
    }
}

/// Authenticated business routes nested under `/api/v1`.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/clients/", handlers::clients::router())
        .nest("/products/", handlers::products::router())
        .nest("/invoices/", handlers::invoices::router())
        .nest("/proformas/", handlers::proformas::router())
        .nest("/delivery-notes/", handlers::delivery_notes::router())
        .nest("/users/", handlers::users::router())
}

/// The complete application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_v1_routes())
        .nest("/auth", handlers::auth::router())
        .merge(handlers::health::router())
        .with_state(state)
}
