//! # Phasewise HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /projects` - Catalog projects with progress, health and a portfolio summary
//! - `GET /projects/{id}` - Phase board, health and linked plans
//! - `GET /projects/{id}/phases/{phase}` - Phase content, progress and lock
//! - `PUT /projects/{id}/phases/{phase}` - Restore saved phase content
//! - `POST /projects/{id}/phases/{phase}/edits` - Apply one editor operation
//! - `POST /projects/{id}/phases/{phase}/progress` - Report progress directly
//! - `GET /projects/{id}/concept-note` - Concept Note text (base64)
//! - `GET /projects/{id}/insights` - Planning insights
//! - `GET /phases/{phase}/suggestions` - Suggested tasks for a phase
//! - `GET /strategy/search?q=` - Strategic plan search
//!
//! `{phase}` is a numeric id (1-6) or a slug such as `feasibility`.
//!
//! ## Configuration
//!
//! - `[server] cors_origins` / `PHASEWISE_CORS_ORIGINS`: comma-separated
//!   origins, or "*" for all (default: localhost only)
//! - `[server] rate_limit` / `PHASEWISE_RATE_LIMIT`: requests per second
//!   (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

pub use handlers::{
    concept_note_handler, edit_handler, health_handler, insights_handler, phase_handler,
    progress_handler, project_handler, projects_handler, rehydrate_handler, search_handler,
    suggestions_handler,
};
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::*;

use crate::config::{Config, ServerConfig};
use crate::workspace::Workspace;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use phasewise_core::{CompletionPolicy, PhasewiseError, StaticPlan, StrategicPlanSource};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Request body limit (2 MiB).
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the open sessions and the strategic plan.
#[derive(Clone)]
pub struct AppState {
    /// One writer at a time across all projects.
    pub workspace: Arc<RwLock<Workspace>>,
    pub plan: Arc<dyn StrategicPlanSource>,
}

impl AppState {
    /// Empty workspace with the built-in plan.
    #[must_use]
    pub fn new(policy: CompletionPolicy) -> Self {
        Self::with_plan(policy, StaticPlan::builtin())
    }

    /// Empty workspace with the given plan.
    #[must_use]
    pub fn with_plan(policy: CompletionPolicy, plan: impl StrategicPlanSource + 'static) -> Self {
        Self {
            workspace: Arc::new(RwLock::new(Workspace::new(policy))),
            plan: Arc::new(plan),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer.
///
/// - `"*"`: allows all origins (development only)
/// - unset: localhost only
/// - otherwise: the comma-separated list of origins
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                restricted_cors(allowed)
            }
        }
        None => build_localhost_cors(),
    }
}

/// Build a CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();
    restricted_cors(origins)
}

fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/projects", get(handlers::projects_handler))
        .route("/projects/{id}", get(handlers::project_handler))
        .route(
            "/projects/{id}/phases/{phase}",
            get(handlers::phase_handler).put(handlers::rehydrate_handler),
        )
        .route(
            "/projects/{id}/phases/{phase}/edits",
            post(handlers::edit_handler),
        )
        .route(
            "/projects/{id}/phases/{phase}/progress",
            post(handlers::progress_handler),
        )
        .route(
            "/projects/{id}/concept-note",
            get(handlers::concept_note_handler),
        )
        .route("/projects/{id}/insights", get(handlers::insights_handler))
        .route(
            "/phases/{phase}/suggestions",
            get(handlers::suggestions_handler),
        )
        .route("/strategy/search", get(handlers::search_handler));

    if server.rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", server.rate_limit);
        router = router.layer(axum_middleware::from_fn_with_state(
            create_rate_limiter(server.rate_limit),
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(server.cors_origins.as_deref()))
                .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(config: &Config) -> Result<(), PhasewiseError> {
    let state = AppState::with_plan(config.policy, config.plan()?);
    let router = create_router(state, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PhasewiseError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Phasewise HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PhasewiseError::Io(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
