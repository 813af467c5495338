use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::dashboard::{aggregate, render_page};
use crate::github::{GithubClient, GithubError};
use crate::util::config::AppConfig;

pub struct AppState {
    pub config: AppConfig,
    pub client: GithubClient,
}

/// Any failure while building the page. Rendered as a bare 500; the browser's
/// meta refresh is the retry.
pub struct AppError(anyhow::Error);

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let auth_or_rate_limit = self
            .0
            .chain()
            .filter_map(|e| e.downcast_ref::<GithubError>())
            .any(GithubError::is_auth_or_rate_limit);

        if auth_or_rate_limit {
            error!(error = ?self.0, "GitHub rejected the request (check token and rate limit)");
        } else {
            error!(error = ?self.0, "Failed to build dashboard");
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CACHE_CONTROL, "no-cache")],
            "Internal Server Error",
        )
            .into_response()
    }
}

async fn health_check() -> &'static str {
    "OK"
}

async fn dashboard_handler(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let github = &state.config.github;
    let counts = aggregate(&state.client, &github.repo_ref(), &github.login).await?;
    let html = render_page(&counts, state.config.dashboard.refresh_secs);

    Ok(([(header::CACHE_CONTROL, "no-cache")], Html(html)).into_response())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(dashboard_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

pub async fn serve(config: AppConfig, client: GithubClient) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let repo = config.github.repo_ref().full_name();
    let state = Arc::new(AppState { config, client });

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!(addr = %addr, repo = %repo, "Server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
