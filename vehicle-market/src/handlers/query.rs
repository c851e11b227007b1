//! Query parameters for the vehicle listing
//!
//! # Example
//!
//! ```rust
//! use vehicle_market::config::PaginationConfig;
//! use vehicle_market::handlers::ListQuery;
//! use vehicle_market::repository::{OrderDirection, SortField};
//!
//! let query = ListQuery::default()
//!     .with_page(2)
//!     .with_limit(50)
//!     .with_sort(SortField::Price)
//!     .with_order(OrderDirection::Descending);
//!
//! let config = PaginationConfig::default();
//! assert_eq!(query.page_number(), 2);
//! assert_eq!(query.items_per_page(&config), 50);
//! assert_eq!(query.vehicle_sort().to_string(), "price desc");
//! ```

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::repository::{OrderDirection, SortField, VehicleFilter, VehicleSort};
use crate::vehicles::{FuelType, VehicleStatus};

/// Query string of `GET /api/v1/vehicles`
///
/// Every parameter is optional. Paging values are normalized by
/// [`page_number`](Self::page_number) and
/// [`items_per_page`](Self::items_per_page) rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Page number (1-indexed). None and 0 both mean page 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Number of items per page. None uses the configured default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Brand to match, case-insensitively
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel: Option<FuelType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VehicleStatus>,

    /// Inclusive lower price bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<u64>,

    /// Inclusive upper price bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u64>,

    /// Field to sort by, newest listings first when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortField>,

    /// Sort direction (asc or desc)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderDirection>,
}

impl ListQuery {
    /// Create a new empty query
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page number
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the number of items per page
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restrict to one brand
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Restrict to a price range
    #[must_use]
    pub fn with_price_range(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Set the sort field
    #[must_use]
    pub fn with_sort(mut self, sort: SortField) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the sort order
    #[must_use]
    pub fn with_order(mut self, order: OrderDirection) -> Self {
        self.order = Some(order);
        self
    }

    /// Get the 1-indexed page number, defaulting to 1
    ///
    /// # Example
    ///
    /// ```rust
    /// use vehicle_market::handlers::ListQuery;
    ///
    /// assert_eq!(ListQuery::new().page_number(), 1);
    /// assert_eq!(ListQuery::new().with_page(5).page_number(), 5);
    ///
    /// // Page 0 is treated as page 1
    /// assert_eq!(ListQuery::new().with_page(0).page_number(), 1);
    /// ```
    #[must_use]
    pub fn page_number(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Get the number of items per page, with defaults and limits applied
    #[must_use]
    pub fn items_per_page(&self, config: &PaginationConfig) -> u32 {
        config.page_size(self.limit)
    }

    /// Whether the price bounds describe an empty range
    #[must_use]
    pub fn has_inverted_price_range(&self) -> bool {
        matches!((self.min_price, self.max_price), (Some(min), Some(max)) if min > max)
    }

    /// Repository filter for this query
    ///
    /// A blank brand is ignored.
    #[must_use]
    pub fn vehicle_filter(&self) -> VehicleFilter {
        VehicleFilter {
            brand: self
                .brand
                .as_deref()
                .map(str::trim)
                .filter(|brand| !brand.is_empty())
                .map(str::to_string),
            fuel: self.fuel,
            status: self.status,
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }

    /// Repository ordering for this query
    ///
    /// Without a sort field the listing is newest first. With a sort field
    /// but no order the direction is ascending.
    #[must_use]
    pub fn vehicle_sort(&self) -> VehicleSort {
        match self.sort {
            Some(field) => VehicleSort::new(field, self.order.unwrap_or_default()),
            None => {
                let default = VehicleSort::default();
                VehicleSort::new(default.field, self.order.unwrap_or(default.direction))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;

    fn try_parse(query: &str) -> Option<ListQuery> {
        let uri: axum::http::Uri = format!("/api/v1/vehicles?{}", query).parse().unwrap();
        Query::<ListQuery>::try_from_uri(&uri).ok().map(|Query(q)| q)
    }

    fn parse(query: &str) -> ListQuery {
        try_parse(query).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = PaginationConfig::default();
        let query = ListQuery::new();
        assert_eq!(query.page_number(), 1);
        assert_eq!(query.items_per_page(&config), 10);
        assert_eq!(query.vehicle_filter(), VehicleFilter::default());
        assert_eq!(query.vehicle_sort(), VehicleSort::default());
    }

    #[test]
    fn test_limit_is_clamped() {
        let config = PaginationConfig::default();
        assert_eq!(ListQuery::new().with_limit(0).items_per_page(&config), 1);
        assert_eq!(ListQuery::new().with_limit(1_000).items_per_page(&config), 100);
    }

    #[test]
    fn test_parses_query_string() {
        let query = parse(
            "page=3&limit=5&brand=Audi&fuel=diesel&status=available\
             &min_price=1000&max_price=20000&sort=mileage&order=desc",
        );
        assert_eq!(query.page, Some(3));
        assert_eq!(query.limit, Some(5));
        assert_eq!(query.fuel, Some(FuelType::Diesel));
        assert_eq!(query.status, Some(VehicleStatus::Available));
        assert_eq!(
            query.vehicle_sort(),
            VehicleSort::new(SortField::Mileage, OrderDirection::Descending)
        );

        let filter = query.vehicle_filter();
        assert_eq!(filter.brand.as_deref(), Some("Audi"));
        assert_eq!(filter.min_price, Some(1_000));
        assert_eq!(filter.max_price, Some(20_000));
    }

    #[test]
    fn test_rejects_unknown_sort_field() {
        assert!(try_parse("sort=colour").is_none());
    }

    #[test]
    fn test_blank_brand_is_ignored() {
        assert_eq!(ListQuery::new().with_brand("  ").vehicle_filter().brand, None);
    }

    #[test]
    fn test_sort_without_order_is_ascending() {
        let query = ListQuery::new().with_sort(SortField::Year);
        assert_eq!(
            query.vehicle_sort(),
            VehicleSort::new(SortField::Year, OrderDirection::Ascending)
        );

        let query = ListQuery::new().with_order(OrderDirection::Ascending);
        assert_eq!(
            query.vehicle_sort(),
            VehicleSort::new(SortField::CreatedAt, OrderDirection::Ascending)
        );
    }

    #[test]
    fn test_inverted_price_range() {
        assert!(ListQuery::new()
            .with_price_range(Some(10), Some(5))
            .has_inverted_price_range());
        assert!(!ListQuery::new()
            .with_price_range(Some(5), None)
            .has_inverted_price_range());
    }
}
