/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, me)
/// - `profile`: Profile read/update endpoints
/// - `community`: Community posts, likes, and comments
/// - `qa`: Questions, answers, resolve and helpful flags

use serde::Deserialize;

pub mod auth;
pub mod community;
pub mod health;
pub mod profile;
pub mod qa;

/// Default page size for listings
const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size for listings
const MAX_PAGE_SIZE: i64 = 100;

/// Pagination-only query parameters
///
/// Used by the comment and answer listings, which take no filters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Page size
    pub limit: Option<i64>,

    /// Page offset
    pub offset: Option<i64>,
}

/// Clamps user-supplied pagination values
pub(crate) fn clamp_page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}
