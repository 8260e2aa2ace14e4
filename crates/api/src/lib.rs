//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for the SWIFT code registry
//! - The client identity extractor used for rate limiting
//! - Mapping of application errors to JSON responses

pub mod error;
pub mod extractors;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method};
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use swiftreg_core::rate_limit::RateLimiter;
use swiftreg_core::registry::RegistryService;
use swiftreg_db::SwiftCodeRepository;

/// The registry facade as wired for the HTTP layer.
pub type Registry = RegistryService<SwiftCodeRepository>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registry facade over the database-backed store.
    pub registry: Arc<Registry>,
}

impl AppState {
    /// Wires the registry over a database connection and a limiter.
    #[must_use]
    pub fn new(db: DatabaseConnection, limiter: RateLimiter) -> Self {
        let store = Arc::new(SwiftCodeRepository::new(db));
        Self {
            registry: Arc::new(RegistryService::new(store, limiter)),
        }
    }
}

/// Creates the main application router.
///
/// An empty `allowed_origins` list allows any origin.
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .nest("/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
