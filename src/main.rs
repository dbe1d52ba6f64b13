use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use gescom_api::services::pdf::WkhtmltopdfRenderer;
use gescom_api::services::SystemClock;
use gescom_api::{app_router, config, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level());

    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;

    if cfg.auto_migrate {
        db::run_migrations(&pool).await.context("migrations failed")?;
    }

    let state = AppState::new(
        Arc::new(pool),
        cfg.clone(),
        Arc::new(SystemClock),
        Arc::new(WkhtmltopdfRenderer::new(cfg.pdf_binary.clone())),
    );

    bootstrap_admin(&state).await?;

    let cors = cors_layer(&cfg);
    let app = app_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors);

    let addr = format!("{}:{}", cfg.host, cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, environment = %cfg.environment, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

/// Create the first admin account on an empty user table when bootstrap
/// credentials are configured.
async fn bootstrap_admin(state: &AppState) -> anyhow::Result<()> {
    let (Some(username), Some(password)) = (
        state.config.bootstrap_admin_username.as_deref(),
        state.config.bootstrap_admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    match state.users.bootstrap_admin(username, password).await {
        Ok(Some(_)) => {}
        Ok(None) => info!("user table not empty, skipping bootstrap admin"),
        Err(err) => warn!(error = %err, "bootstrap admin creation failed"),
    }
    Ok(())
}

fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_allowed_origins
        .as_deref()
        .unwrap_or("")
        .split(',')
        .filter_map(|origin| {
            let origin = origin.trim();
            if origin.is_empty() {
                return None;
            }
            match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin, "ignoring malformed CORS origin");
                    None
                }
            }
        })
        .collect();

    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.is_empty() {
        // No explicit origins configured; development convenience only.
        base.allow_origin(Any)
    } else {
        base.allow_origin(AllowOrigin::list(origins))
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => warn!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
