//! Paging parameters for list queries

use serde::{Deserialize, Serialize};

/// Paging window for list queries (`limit`/`offset` request parameters).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageParams {
    /// Maximum number of rows to return
    pub limit: u32,
    /// Number of rows to skip
    pub offset: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
        }
    }
}

impl PageParams {
    /// Create paging parameters, clamping the limit to 1..=100.
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: limit.clamp(1, 100),
            offset,
        }
    }

    /// Limit as the type database bindings expect
    pub fn limit(&self) -> i64 {
        self.limit as i64
    }

    /// Offset as the type database bindings expect
    pub fn offset(&self) -> i64 {
        self.offset as i64
    }
}
