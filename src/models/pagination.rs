//! Pagination types shared by every list endpoint

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};

/// Page number used when the request does not name one
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the request does not name one
pub const DEFAULT_LIMIT: u32 = 10;

/// Parse an optional numeric query parameter, reading `page=` as absent
///
/// Query strings carry every value as text, so an empty value falls back to
/// the default while anything else must parse.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.is_empty() => value.parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

/// Pagination metadata for a list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Total number of items across all pages
    pub total: usize,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Items per page
    pub limit: u32,
    /// `ceil(total / limit)`, or 0 when `limit` is 0
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// One page of items plus its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Envelope returned by list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T, F> {
    pub data: Vec<T>,
    pub pagination: Pagination,
    pub filters: F,
}

impl<T, F> ListResponse<T, F> {
    pub fn new(page: Page<T>, filters: F) -> Self {
        Self {
            data: page.data,
            pagination: page.pagination,
            filters,
        }
    }
}
