//! API middleware
//!
//! Shared application state, the serialized error body, and the access
//! check applied per resource.

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::AppVariant;
use crate::resource::{AccessPolicy, FilterError, ResourceDescriptor, ResourceRegistry};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ResourceRegistry>,
    pub templates: Arc<tera::Tera>,
    pub variant: AppVariant,
    /// Bearer token accepted by restricted resources
    pub api_token: Option<String>,
    pub site_domain: String,
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        Self::validation_error(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "FORBIDDEN" => StatusCode::FORBIDDEN,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

/// Extract a bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get(header::AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;
    auth_str.strip_prefix("Bearer ").map(|t| t.to_string())
}

/// Enforce the resource's access policy.
///
/// Open resources skip the check; restricted resources require the
/// configured bearer token. With no token configured, restricted resources
/// reject every request.
pub fn authorize(
    descriptor: &ResourceDescriptor,
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(), ApiError> {
    match descriptor.access_policy() {
        AccessPolicy::Open => Ok(()),
        AccessPolicy::Restricted => {
            let expected = state
                .api_token
                .as_deref()
                .ok_or_else(|| ApiError::unauthorized("API access is not configured"))?;
            match extract_bearer_token(headers) {
                Some(token) if token == expected => Ok(()),
                Some(_) => Err(ApiError::unauthorized("Invalid API token")),
                None => Err(ApiError::unauthorized("Missing API token")),
            }
        }
    }
}
