//! Envelopes shared by every endpoint.

use serde::{Deserialize, Serialize};

/// The response when an error occurs with an API request
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorDto {
    /// The error message
    pub error: String,
}

/// Liveness status of the service
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthDto {
    /// Always `ok`
    pub status: String,
}

/// A single page of results
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct PageDto<T> {
    /// Entries on this page
    pub items: Vec<T>,
    /// 1-based page number
    pub page: u64,
    /// Entries per page
    pub per_page: u64,
    /// Entries across all pages
    pub total: u64,
    /// Number of pages
    pub total_pages: u64,
}

impl<T> PageDto<T> {
    /// Builds a page from a zero-based `page_index` and the overall `total`.
    pub fn new(items: Vec<T>, page_index: u64, per_page: u64, total: u64) -> Self {
        Self {
            items,
            page: page_index + 1,
            per_page,
            total,
            total_pages: total.div_ceil(per_page.max(1)),
        }
    }

    /// Converts every entry with `f`, keeping the page numbers.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PageDto<U> {
        PageDto {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Page selection shared by paginated endpoints
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct PageParams {
    /// 1-based page number, defaults to 1
    pub page: Option<u64>,
    /// Items per page, defaults to 20 and is clamped to 1..=100
    pub per_page: Option<u64>,
}

impl PageParams {
    /// Page size when none is requested
    pub const DEFAULT_PER_PAGE: u64 = 20;
    /// Largest accepted page size
    pub const MAX_PER_PAGE: u64 = 100;
    /// Largest accepted page number, keeping the row offset within range of the database
    pub const MAX_PAGE: u64 = 1_000_000;

    /// Zero-based page index used by the database paginator
    ///
    /// Page numbers are clamped to `1..=MAX_PAGE`; pages past the last one come back empty.
    pub fn page_index(&self) -> u64 {
        self.page.unwrap_or(1).clamp(1, Self::MAX_PAGE) - 1
    }

    /// Requested page size clamped to `1..=MAX_PER_PAGE`
    pub fn per_page(&self) -> u64 {
        self.per_page
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .clamp(1, Self::MAX_PER_PAGE)
    }
}
