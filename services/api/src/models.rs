//! API models for request and response payloads
//!
//! Request bodies keep every field optional: PUT and PATCH both lay the
//! supplied fields over the stored record, and the merged result is what gets
//! validated.

use serde::{Deserialize, Deserializer, Serialize};

pub mod address;
pub mod catalog;
pub mod profile;
pub mod user;

/// Tell an absent field (`None`) apart from an explicit `null` (`Some(None)`).
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query parameters for listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) as i64 * self.limit() as i64
    }
}

/// Response for listings with pagination
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, query: &ListQuery, total: i64) -> Self {
        Self {
            items,
            page: query.page(),
            limit: query.limit(),
            total,
        }
    }
}
