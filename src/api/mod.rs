//! API layer - HTTP handlers and routing
//!
//! This module wires the HTTP surface of one app variant:
//! - the generic resource endpoints under `/api/r1/`
//! - the template-rendered index, articles and admin pages
//! - CORS and request tracing layers

pub mod middleware;
pub mod pages;
pub mod resources;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::catalog::AppVariant;

pub use middleware::{ApiError, AppState};

/// Build the complete router for the given state's app variant.
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let mut router = Router::new()
        .nest("/api/r1", resources::router())
        .route("/", get(pages::index))
        .route("/admin", get(pages::admin_index))
        .route("/admin/", get(pages::admin_index));

    if state.variant == AppVariant::Scribble {
        router = router
            .route("/articles", get(pages::articles))
            .route("/articles/", get(pages::articles));
    }

    router
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
