//! Request-parameter validation
//!
//! Turns raw query-string parameters into compiled equality filters and
//! paging parameters. A parameter outside the resource's filter whitelist is
//! an error, never silently ignored; only the reserved paging parameters are
//! exempt from the whitelist.

use std::collections::HashMap;

use thiserror::Error;

use crate::models::PageParams;

use super::descriptor::ResourceDescriptor;
use super::field::CompiledFilter;

/// Parameters consumed by the engine itself rather than the whitelist.
pub const RESERVED_PARAMS: &[&str] = &["limit", "offset"];

/// A rejected request parameter.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("filtering on '{0}' is not allowed")]
    NotAllowed(String),
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Compile the non-reserved request parameters against the descriptor's
/// filter whitelist. Parameters come back in sorted order so the generated
/// SQL is deterministic.
pub fn compile_filters(
    descriptor: &ResourceDescriptor,
    params: &HashMap<String, String>,
) -> Result<Vec<CompiledFilter>, FilterError> {
    let mut names: Vec<&String> = params
        .keys()
        .filter(|name| !RESERVED_PARAMS.contains(&name.as_str()))
        .collect();
    names.sort();

    let mut filters = Vec::with_capacity(names.len());
    for name in names {
        let (sql, ty) = descriptor
            .filter_binding(name)
            .ok_or_else(|| FilterError::NotAllowed(name.clone()))?;
        let value = ty.parse(&params[name]).map_err(|e| FilterError::InvalidValue {
            field: name.clone(),
            reason: e.to_string(),
        })?;
        filters.push(CompiledFilter { sql, value });
    }
    Ok(filters)
}

/// Parse the reserved `limit`/`offset` parameters, falling back to defaults.
pub fn parse_paging(params: &HashMap<String, String>) -> Result<PageParams, FilterError> {
    let defaults = PageParams::default();
    let limit = parse_reserved(params, "limit", defaults.limit)?;
    let offset = parse_reserved(params, "offset", defaults.offset)?;
    Ok(PageParams::new(limit, offset))
}

fn parse_reserved(
    params: &HashMap<String, String>,
    name: &str,
    default: u32,
) -> Result<u32, FilterError> {
    match params.get(name) {
        None => Ok(default),
        Some(raw) => raw.parse::<u32>().map_err(|_| FilterError::InvalidValue {
            field: name.to_string(),
            reason: format!("expected a non-negative integer, got '{raw}'"),
        }),
    }
}
