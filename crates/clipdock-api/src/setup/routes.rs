//! Route configuration and setup.
//!
//! Public routes (health, OpenAPI, thumbnail serving) are merged with the
//! JWT-protected video routes, then wrapped in the body-limit, CORS, and
//! trace layers.

use crate::auth::{auth_middleware, AuthState};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use clipdock_core::Config;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

// Multipart framing adds overhead on top of the video bytes.
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState::new(&config.jwt_secret));

    let body_limit = (config.max_video_size_bytes + MULTIPART_OVERHEAD_BYTES) as usize;

    let app = public_routes()
        .merge(
            protected_routes().layer(axum::middleware::from_fn_with_state(
                auth_state,
                auth_middleware,
            )),
        )
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/thumbnails/{id}",
            get(handlers::thumbnails::get_thumbnail),
        )
        .route("/api/openapi.json", get(openapi_spec))
}

fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/videos",
            post(handlers::videos::create_video).get(handlers::videos::list_videos),
        )
        .route(
            "/api/videos/{id}",
            get(handlers::videos::get_video).delete(handlers::videos::delete_video),
        )
        .route(
            "/api/videos/{id}/upload",
            post(handlers::video_upload::upload_video),
        )
        .route(
            "/api/videos/{id}/thumbnail",
            post(handlers::thumbnails::upload_thumbnail),
        )
}

async fn openapi_spec() -> impl IntoResponse {
    use utoipa::OpenApi;
    Json(crate::api_doc::ApiDoc::openapi())
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();
        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Run an async check with timeout; returns status string "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
struct HealthCheckResponse {
    status: String,
    database: String,
    storage: String,
}

/// Health check (database and storage backend).
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let mut response = HealthCheckResponse {
        status: "healthy".to_string(),
        database: "unknown".to_string(),
        storage: "unknown".to_string(),
    };

    let pool = state.db_pool.clone();
    response.database = run_check(
        TIMEOUT,
        async move { sqlx::query("SELECT 1").execute(&pool).await.map(drop) },
        "unhealthy",
    )
    .await;
    let overall_healthy = response.database == "healthy";

    // Storage issues don't fail overall health (graceful degradation)
    let storage = state.storage.clone();
    response.storage = run_check(
        TIMEOUT,
        async move {
            storage
                .exists("health-check-non-existent-key")
                .await
                .map(drop)
        },
        "degraded",
    )
    .await;

    let status_code = if overall_healthy {
        StatusCode::OK
    } else {
        response.status = "unhealthy".to_string();
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
