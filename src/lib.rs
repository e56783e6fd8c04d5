//! Redaction - read-only REST API over a content-management store
//!
//! This library exposes the content store's entities as declarative REST
//! resources in two app variants (`front` and `scribble`).

pub mod api;
pub mod catalog;
pub mod config;
pub mod db;
pub mod models;
pub mod resource;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use api::AppState;
use catalog::AppVariant;
use config::Config;

/// Load configuration, open the store and serve one app variant.
pub async fn serve(variant: AppVariant) -> Result<()> {
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded ({} app)", variant.label());

    let pool = db::create_pool(&config.database).await?;
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Content store ready: {}", config.database.url);

    let registry = variant.build_registry(&pool, &config)?;
    tracing::info!("Mounted resources: {}", registry.names().join(", "));

    let templates = api::pages::load_templates()?;

    let state = AppState {
        registry: Arc::new(registry),
        templates: Arc::new(templates),
        variant,
        api_token: config.api.token.clone(),
        site_domain: config.site.domain.clone(),
    };

    let app = api::build_router(state, &config.server.cors_origin);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
