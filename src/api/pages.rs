//! Template-rendered pages
//!
//! The handful of non-API routes: the index page, the scribble articles
//! page, and the admin overview showing the mounted resource registry.

use axum::{extract::State, response::Html};
use serde::Serialize;
use tera::{Context, Tera};

use crate::api::middleware::{ApiError, AppState};

/// Load the page templates from the `templates/` directory.
pub fn load_templates() -> anyhow::Result<Tera> {
    let tera = Tera::new("templates/**/*.html")
        .map_err(|e| anyhow::anyhow!("Failed to load templates: {e}"))?;
    Ok(tera)
}

#[derive(Debug, Serialize)]
struct ResourceSummary {
    name: String,
    filters: Vec<String>,
    open: bool,
}

fn render(state: &AppState, template: &str, context: &Context) -> Result<Html<String>, ApiError> {
    state
        .templates
        .render(template, context)
        .map(Html)
        .map_err(|e| ApiError::internal_error(format!("Failed to render {template}: {e}")))
}

/// GET / - Index page
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let mut context = Context::new();
    context.insert("site_domain", &state.site_domain);
    context.insert("resources", &state.registry.names());
    render(&state, "index.html", &context)
}

/// GET /articles/ - Articles page (scribble app only)
pub async fn articles(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let mut context = Context::new();
    context.insert("site_domain", &state.site_domain);
    render(&state, "articles.html", &context)
}

/// GET /admin/ - Admin overview of the mounted resources
pub async fn admin_index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let resources: Vec<ResourceSummary> = state
        .registry
        .names()
        .into_iter()
        .filter_map(|name| {
            let entry = state.registry.get(name)?;
            Some(ResourceSummary {
                name: name.to_string(),
                filters: entry
                    .descriptor
                    .filter_whitelist()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                open: entry.descriptor.access_policy() == crate::resource::AccessPolicy::Open,
            })
        })
        .collect();

    let mut context = Context::new();
    context.insert("variant", state.variant.label());
    context.insert("resources", &resources);
    render(&state, "admin.html", &context)
}
