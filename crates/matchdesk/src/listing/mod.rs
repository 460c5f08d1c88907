//! Paginated property listing.

pub mod tracker;

use serde::{Deserialize, Serialize};

pub use tracker::{FetchTracker, Ticket};

use crate::db::property_repo::{self, SortOrder};
use crate::db::Database;
use crate::error::{MatchError, Result};
use crate::filter::{non_blank, Column, PropertyFilter};
use crate::model::Property;

/// Columns a listing may be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    #[default]
    ReceivedAt,
    Area,
    Deposit,
    Rent,
}

impl OrderBy {
    pub fn column(&self) -> Column {
        match self {
            OrderBy::ReceivedAt => Column::ReceivedAt,
            OrderBy::Area => Column::Area,
            OrderBy::Deposit => Column::Deposit,
            OrderBy::Rent => Column::Rent,
        }
    }
}

/// One page of a listing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// 1-indexed.
    pub page: u64,
    pub page_size: u64,
    pub order_by: OrderBy,
    pub asc: bool,
    /// Free-text search; takes precedence over the filter's keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            order_by: OrderBy::ReceivedAt,
            asc: false,
            keyword: None,
        }
    }
}

impl PageRequest {
    pub fn offset(&self) -> Option<u64> {
        self.page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(self.page_size))
    }

    fn validate(&self) -> Result<u64> {
        if self.page == 0 {
            return Err(MatchError::ValidationFailed(
                "page must be at least 1".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(MatchError::ValidationFailed(
                "page size must be positive".to_string(),
            ));
        }
        // SQLite binds LIMIT and OFFSET as signed 64-bit integers
        let max = i64::MAX as u64;
        if self.page_size > max {
            return Err(MatchError::ValidationFailed(format!(
                "page size {} is out of range",
                self.page_size
            )));
        }
        self.offset().filter(|offset| *offset <= max).ok_or_else(|| {
            MatchError::ValidationFailed(format!(
                "page {} with page size {} is out of range",
                self.page, self.page_size
            ))
        })
    }

    fn sort(&self) -> SortOrder {
        SortOrder::new(self.order_by.column(), self.asc)
    }
}

/// Items of one page together with the size of the whole result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub total_pages: u64,
}

/// Number of pages for `total` items; never less than one.
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// Fetches one page of properties. The baseline status exclusion always
/// applies; ties in the sort column are broken by ascending property id.
pub fn fetch_page(
    db: &Database,
    request: &PageRequest,
    filter: &PropertyFilter,
) -> Result<Page<Property>> {
    let offset = request.validate()?;
    let filter = merge_keyword(filter, request.keyword.as_deref());
    let predicate = filter.build();

    let _span = tracing::info_span!(
        "listing.fetch_page",
        page = request.page,
        page_size = request.page_size
    )
    .entered();

    let (items, total) =
        property_repo::query(db, &predicate, request.sort(), request.page_size, offset)
            .map_err(MatchError::read("properties"))?;

    log::debug!(
        "Fetched page {} ({} items of {})",
        request.page,
        items.len(),
        total
    );

    Ok(Page {
        items,
        total,
        total_pages: total_pages(total, request.page_size),
    })
}

/// Fetches every matching property, without pagination.
pub fn fetch_all(
    db: &Database,
    filter: &PropertyFilter,
    order_by: OrderBy,
    asc: bool,
) -> Result<Vec<Property>> {
    let predicate = filter.build();
    property_repo::select(db, &predicate, SortOrder::new(order_by.column(), asc))
        .map_err(MatchError::read("properties"))
}

fn merge_keyword(filter: &PropertyFilter, keyword: Option<&str>) -> PropertyFilter {
    let mut merged = filter.clone();
    if let Some(keyword) = non_blank(keyword) {
        merged.keyword = Some(keyword.to_string());
    }
    merged
}
