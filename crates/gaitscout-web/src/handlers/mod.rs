//! Request handlers.

pub mod candidates;
pub mod feedback;
pub mod learn;
pub mod library;

use serde::{Deserialize, Serialize};

use gaitscout_common::ApiError;

/// Page query parameters shared by the list endpoints.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl Pagination {
    /// Validated (page, page_size): page >= 1, page_size in 1..=100.
    pub fn resolve(&self) -> Result<(usize, usize), ApiError> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(ApiError::Validation("page must be >= 1".into()));
        }
        let page_size = self.page_size.unwrap_or(20);
        if !(1..=100).contains(&page_size) {
            return Err(ApiError::Validation("page_size must be in 1..=100".into()));
        }
        Ok((page, page_size))
    }
}

/// One page of a listing.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn slice(mut all: Vec<T>, page: usize, page_size: usize) -> Self {
        let total = all.len();
        let start = (page - 1).saturating_mul(page_size).min(total);
        let end = start.saturating_add(page_size).min(total);
        let items = all.drain(start..end).collect();
        Self { items, total, page, page_size }
    }
}
