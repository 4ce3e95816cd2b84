//! Pagination and ordering types for list endpoints.

use serde::{Deserialize, Serialize};

/// Fixed number of records served per page.
pub const PAGE_SIZE: u32 = 25;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
        }
    }
}

impl PageRequest {
    /// Creates a page request, treating `0` like the first page.
    #[must_use]
    pub fn new(page: u32) -> Self {
        Self { page: page.max(1) }
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(PAGE_SIZE)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(PAGE_SIZE)
    }
}

/// Ordering of list results by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Most recently created first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
}

impl SortOrder {
    /// Parse the `order` query value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            _ => None,
        }
    }

    /// Whether results are sorted descending by creation time.
    #[must_use]
    pub const fn is_descending(&self) -> bool {
        matches!(self, Self::Newest)
    }
}
