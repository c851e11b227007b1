//! Pagination presentation
//!
//! Turns raw listing counts into what a list view needs to draw its
//! navigation controls:
//!
//! - [`PaginationMetadata`] - current/last page, neighbours, and whether
//!   controls are needed at all
//! - [`visible_page_numbers`] - a bounded window of page links with ellipsis
//!   markers standing in for the collapsed ranges
//! - [`PageNavigator`] - client-side page-change validation
//! - [`PaginationView`] - metadata and page links bundled for a response body
//!
//! ## Example
//!
//! ```rust
//! use vehicle_market::pagination::{visible_page_numbers, PageItem, PaginationMetadata};
//!
//! let metadata = PaginationMetadata::compute(95, 10, 3).unwrap();
//! assert_eq!(metadata.last_page, 10);
//! assert!(metadata.has_to_paginate);
//!
//! let pages = visible_page_numbers(metadata.current_page, metadata.last_page, 5);
//! assert_eq!(
//!     pages,
//!     vec![
//!         PageItem::Page(1),
//!         PageItem::Page(2),
//!         PageItem::Page(3),
//!         PageItem::Page(4),
//!         PageItem::Page(5),
//!         PageItem::Ellipsis,
//!         PageItem::Page(10),
//!     ]
//! );
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of page links in the sliding window
pub const DEFAULT_MAX_VISIBLE_PAGES: u32 = 5;

/// Marker rendered in place of collapsed page ranges
pub const ELLIPSIS: &str = "…";

/// Number of pages needed to show `total_results` items, never less than one
///
/// Fails when `page_size` is zero.
pub fn last_page(total_results: u64, page_size: u32) -> Result<u32> {
    if page_size == 0 {
        return Err(Error::contract("page size must be at least 1"));
    }
    let pages = total_results.div_ceil(u64::from(page_size)).max(1);
    Ok(u32::try_from(pages).unwrap_or(u32::MAX))
}

/// Navigation metadata for one page of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    /// Page being shown (1-indexed)
    pub current_page: u32,
    /// Last page that has results (at least 1)
    pub last_page: u32,
    /// Total number of results across all pages
    pub total_results: u64,
    /// Whether a previous page exists
    pub has_previous_page: bool,
    /// Whether a next page exists
    pub has_next_page: bool,
    /// Previous page number, only when `has_previous_page`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<u32>,
    /// Next page number, only when `has_next_page`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u32>,
    /// Whether navigation controls are needed (more than one page)
    pub has_to_paginate: bool,
}

impl PaginationMetadata {
    /// Compute metadata for `current_page` of a listing
    ///
    /// `current_page` is taken as given; callers that must reject pages past
    /// the end clamp it against [`last_page`] first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContractViolation`] when `page_size` or `current_page`
    /// is zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use vehicle_market::pagination::PaginationMetadata;
    ///
    /// let empty = PaginationMetadata::compute(0, 10, 1).unwrap();
    /// assert_eq!(empty.last_page, 1);
    /// assert!(!empty.has_to_paginate);
    ///
    /// assert!(PaginationMetadata::compute(10, 0, 1).is_err());
    /// ```
    pub fn compute(total_results: u64, page_size: u32, current_page: u32) -> Result<Self> {
        if current_page == 0 {
            return Err(Error::contract("current page must be at least 1"));
        }
        let last_page = last_page(total_results, page_size)?;

        let has_previous_page = current_page > 1;
        let has_next_page = current_page < last_page;

        Ok(Self {
            current_page,
            last_page,
            total_results,
            has_previous_page,
            has_next_page,
            previous_page: has_previous_page.then(|| current_page - 1),
            next_page: has_next_page.then(|| current_page + 1),
            has_to_paginate: last_page > 1,
        })
    }

    /// Page links to display around the current page
    pub fn visible_pages(&self, max_visible: u32) -> Vec<PageItem> {
        visible_page_numbers(self.current_page, self.last_page, max_visible)
    }
}

/// One entry of the page link list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageItemRepr", into = "PageItemRepr")]
pub enum PageItem {
    /// Link to a page number
    Page(u32),
    /// Collapsed range of pages
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(page) => write!(f, "{}", page),
            Self::Ellipsis => write!(f, "{}", ELLIPSIS),
        }
    }
}

/// Wire form: a bare number or the ellipsis string
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PageItemRepr {
    Page(u32),
    Marker(String),
}

impl From<PageItem> for PageItemRepr {
    fn from(item: PageItem) -> Self {
        match item {
            PageItem::Page(page) => Self::Page(page),
            PageItem::Ellipsis => Self::Marker(ELLIPSIS.to_string()),
        }
    }
}

impl TryFrom<PageItemRepr> for PageItem {
    type Error = String;

    fn try_from(repr: PageItemRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            PageItemRepr::Page(page) => Ok(Self::Page(page)),
            PageItemRepr::Marker(marker) if marker == ELLIPSIS => Ok(Self::Ellipsis),
            PageItemRepr::Marker(other) => Err(format!("unknown page marker: {}", other)),
        }
    }
}

/// Page links for a listing, collapsing distant pages into ellipses
///
/// Shows every page when there are at most `max_visible` of them. Otherwise
/// shows a window of `max_visible` pages centred on `current_page`, shifted
/// back when it would run past the last page, plus links to the first and
/// last page with an ellipsis wherever pages are skipped.
///
/// Inputs are bounded rather than rejected: `last_page` and `max_visible`
/// are raised to 1 and `current_page` is clamped into `1..=last_page`.
///
/// # Example
///
/// ```rust
/// use vehicle_market::pagination::{visible_page_numbers, PageItem::*};
///
/// assert_eq!(
///     visible_page_numbers(10, 10, 5),
///     vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), Page(10)]
/// );
/// ```
pub fn visible_page_numbers(current_page: u32, last_page: u32, max_visible: u32) -> Vec<PageItem> {
    let last_page = last_page.max(1);
    let max_visible = max_visible.max(1);
    let current_page = current_page.clamp(1, last_page);

    if last_page <= max_visible {
        return (1..=last_page).map(PageItem::Page).collect();
    }

    let half = max_visible / 2;
    let mut start = current_page.saturating_sub(half).max(1);
    let end = last_page.min(start.saturating_add(max_visible - 1));
    if end - start < max_visible - 1 {
        // re-anchor against the last page
        start = end.saturating_sub(max_visible - 1).max(1);
    }

    let mut pages = Vec::with_capacity(max_visible as usize + 4);
    if start > 1 {
        pages.push(PageItem::Page(1));
        if start > 2 {
            pages.push(PageItem::Ellipsis);
        }
    }
    pages.extend((start..=end).map(PageItem::Page));
    if end < last_page {
        if end < last_page - 1 {
            pages.push(PageItem::Ellipsis);
        }
        pages.push(PageItem::Page(last_page));
    }
    pages
}

/// Metadata plus page links, as sent to list views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationView {
    /// Navigation metadata
    #[serde(flatten)]
    pub metadata: PaginationMetadata,
    /// Page links to render
    pub pages: Vec<PageItem>,
}

impl PaginationView {
    /// Build the view for `metadata` with at most `max_visible` windowed links
    pub fn new(metadata: PaginationMetadata, max_visible: u32) -> Self {
        Self {
            pages: metadata.visible_pages(max_visible),
            metadata,
        }
    }
}

/// An accepted page change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageChange {
    /// Page shown before the change
    pub from: u32,
    /// Page requested
    pub to: u32,
}

/// Page-change validation for a list view
///
/// Tracks the page a view is showing and accepts a change only to a
/// different page inside `1..=last_page`. Anything else is a no-op, not an
/// error.
///
/// # Example
///
/// ```rust
/// use vehicle_market::pagination::{PageChange, PageNavigator};
///
/// let mut nav = PageNavigator::new(1, 3);
/// assert_eq!(nav.request_page(3), Some(PageChange { from: 1, to: 3 }));
/// assert_eq!(nav.request_page(3), None); // already there
/// assert_eq!(nav.request_page(4), None); // out of range
/// assert_eq!(nav.current_page(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNavigator {
    current_page: u32,
    last_page: u32,
}

impl PageNavigator {
    /// Create a navigator, bounding the inputs like [`visible_page_numbers`]
    pub fn new(current_page: u32, last_page: u32) -> Self {
        let last_page = last_page.max(1);
        Self {
            current_page: current_page.clamp(1, last_page),
            last_page,
        }
    }

    /// Create a navigator positioned on the page described by `metadata`
    pub fn from_metadata(metadata: &PaginationMetadata) -> Self {
        Self::new(metadata.current_page, metadata.last_page)
    }

    /// Page currently shown
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Last available page
    pub fn last_page(&self) -> u32 {
        self.last_page
    }

    /// Whether a change to `page` would be accepted
    pub fn can_change_to(&self, page: u32) -> bool {
        (1..=self.last_page).contains(&page) && page != self.current_page
    }

    /// Move to `page` if allowed, returning the change to emit
    pub fn request_page(&mut self, page: u32) -> Option<PageChange> {
        if !self.can_change_to(page) {
            return None;
        }
        let change = PageChange {
            from: self.current_page,
            to: page,
        };
        self.current_page = page;
        Some(change)
    }

    /// Move one page back
    pub fn previous(&mut self) -> Option<PageChange> {
        self.request_page(self.current_page.saturating_sub(1))
    }

    /// Move one page forward
    pub fn next(&mut self) -> Option<PageChange> {
        self.request_page(self.current_page.saturating_add(1))
    }

    /// Page links around the current page
    pub fn visible_pages(&self, max_visible: u32) -> Vec<PageItem> {
        visible_page_numbers(self.current_page, self.last_page, max_visible)
    }
}
