use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use gescom_api::auth::AuthService;
use gescom_api::config::AppConfig;
use gescom_api::entities::user::UserRole;
use gescom_api::entities::{client, product, user};
use gescom_api::services::pdf::PdfRenderer;
use gescom_api::services::users::CreateUserInput;
use gescom_api::services::FixedClock;
use gescom_api::{app_router, db, AppState};

#[allow(dead_code)]
pub const ADMIN_USERNAME: &str = "admin";
#[allow(dead_code)]
pub const ADMIN_PASSWORD: &str = "admin-secret-1";

/// Stub renderer: succeeds or fails deterministically, no external binary.
pub struct StubRenderer {
    pub succeed: bool,
}

#[async_trait]
impl PdfRenderer for StubRenderer {
    async fn render(&self, html: &str) -> Option<Vec<u8>> {
        if self.succeed {
            let mut bytes = b"%PDF-1.4 stub\n".to_vec();
            bytes.extend_from_slice(&(html.len() as u32).to_be_bytes());
            Some(bytes)
        } else {
            None
        }
    }
}

/// Application harness over a throwaway file-backed SQLite database with a
/// pinned clock and a stub PDF renderer.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub clock: Arc<FixedClock>,
    pub admin: user::Model,
    token: String,
    _db_dir: tempfile::TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_renderer(StubRenderer { succeed: true }).await
    }

    pub async fn with_failing_renderer() -> Self {
        Self::with_renderer(StubRenderer { succeed: false }).await
    }

    async fn with_renderer(renderer: StubRenderer) -> Self {
        let db_dir = tempfile::tempdir().expect("create temp dir");
        let db_path = db_dir.path().join("gescom_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "test_secret_key_for_testing_purposes_only_32chars".to_string(),
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("create test database");
        db::run_migrations(&pool).await.expect("run migrations");

        let clock = Arc::new(FixedClock::at("2025-03-10T12:00:00Z"));
        let state = AppState::new(
            Arc::new(pool),
            cfg,
            clock.clone(),
            Arc::new(renderer),
        );

        let admin = state
            .users
            .create(CreateUserInput {
                username: ADMIN_USERNAME.to_string(),
                password: ADMIN_PASSWORD.to_string(),
                email: Some("admin@example.com".to_string()),
                first_name: None,
                last_name: None,
                phone: None,
                role: UserRole::Admin,
            })
            .await
            .expect("seed admin user");

        let pair = state
            .auth
            .generate_token_pair(&admin)
            .expect("issue admin token");

        let router = app_router(state.clone());

        Self {
            router,
            state,
            clock,
            admin,
            token: pair.access_token,
            _db_dir: db_dir,
        }
    }

    /// Access the auth service used by the test application.
    #[allow(dead_code)]
    pub fn auth_service(&self) -> Arc<AuthService> {
        self.state.auth.clone()
    }

    #[allow(dead_code)]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {tok}"));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Convenience helper for authenticated JSON requests.
    pub async fn request_authenticated(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request(method, uri, body, Some(self.token())).await
    }

    pub async fn seed_client(&self, name: &str) -> client::Model {
        self.state
            .clients
            .create(gescom_api::services::clients::CreateClientInput {
                name: name.to_string(),
                phone: Some("+221770000000".to_string()),
                email: None,
                address: Some("Dakar".to_string()),
                tax_id: None,
            })
            .await
            .expect("seed client")
    }

    pub async fn seed_product(
        &self,
        name: &str,
        unit_price: Decimal,
        tax_rate: Decimal,
    ) -> product::Model {
        self.state
            .products
            .create(gescom_api::services::products::CreateProductInput {
                name: name.to_string(),
                description: None,
                unit_price,
                tax_rate,
            })
            .await
            .expect("seed product")
    }
}

/// Read a response body as JSON.
pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect response body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("response body is json")
}

/// Assert a status and return the parsed body.
pub async fn expect_json(response: axum::response::Response, status: StatusCode) -> Value {
    assert_eq!(
        response.status(),
        status,
        "unexpected status for response body"
    );
    read_json(response).await
}
