//! Slicing, ordering and filtering types for repository queries
//!
//! # Example
//!
//! ```rust
//! use vehicle_market::repository::{OrderDirection, Pagination, SortField, VehicleSort};
//!
//! let pagination = Pagination::page(3, 20);
//! assert_eq!(pagination.offset, 40);
//!
//! let sort = VehicleSort::new(SortField::Price, OrderDirection::Ascending);
//! assert_eq!(sort.to_string(), "price asc");
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vehicles::{FuelType, Vehicle, VehicleStatus};

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderDirection {
    /// Sort in ascending order
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Sort in descending order
    #[serde(rename = "desc")]
    Descending,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Pagination parameters for limiting query results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    /// Create new pagination parameters
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Create pagination for a specific page number (1-indexed)
    ///
    /// # Example
    ///
    /// ```rust
    /// use vehicle_market::repository::Pagination;
    ///
    /// let page3 = Pagination::page(3, 20);
    /// assert_eq!(page3.offset, 40);
    /// assert_eq!(page3.limit, 20);
    /// ```
    #[must_use]
    pub const fn page(page_number: u64, page_size: u64) -> Self {
        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        Self {
            offset,
            limit: page_size,
        }
    }
}

/// Field a vehicle listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Asking price
    Price,
    /// Model year
    Year,
    /// Odometer reading
    Mileage,
    /// Listing creation time
    #[default]
    CreatedAt,
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Price => write!(f, "price"),
            Self::Year => write!(f, "year"),
            Self::Mileage => write!(f, "mileage"),
            Self::CreatedAt => write!(f, "created_at"),
        }
    }
}

/// Ordering applied to a vehicle listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleSort {
    /// Field to sort by
    pub field: SortField,
    /// Sort direction
    pub direction: OrderDirection,
}

impl VehicleSort {
    /// Create a new sort specification
    #[must_use]
    pub const fn new(field: SortField, direction: OrderDirection) -> Self {
        Self { field, direction }
    }

    /// Compare two vehicles under this ordering
    ///
    /// Ties are broken by VIN so that page boundaries are stable.
    pub fn compare(&self, a: &Vehicle, b: &Vehicle) -> Ordering {
        let primary = match self.field {
            SortField::Price => a.price.cmp(&b.price),
            SortField::Year => a.year.cmp(&b.year),
            SortField::Mileage => a.mileage.cmp(&b.mileage),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        let primary = match self.direction {
            OrderDirection::Ascending => primary,
            OrderDirection::Descending => primary.reverse(),
        };
        primary.then_with(|| a.vin.cmp(&b.vin))
    }
}

impl Default for VehicleSort {
    /// Newest listings first
    fn default() -> Self {
        Self::new(SortField::CreatedAt, OrderDirection::Descending)
    }
}

impl fmt::Display for VehicleSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction)
    }
}

/// Conditions a listed vehicle must satisfy
///
/// Every populated field must match; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleFilter {
    /// Brand, compared case-insensitively
    pub brand: Option<String>,
    /// Fuel type
    pub fuel: Option<FuelType>,
    /// Listing status
    pub status: Option<VehicleStatus>,
    /// Inclusive lower price bound
    pub min_price: Option<u64>,
    /// Inclusive upper price bound
    pub max_price: Option<u64>,
}

impl VehicleFilter {
    /// Check whether a vehicle satisfies the filter
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        if let Some(brand) = &self.brand {
            if !vehicle.brand.eq_ignore_ascii_case(brand) {
                return false;
            }
        }
        if self.fuel.is_some_and(|fuel| vehicle.fuel != fuel) {
            return false;
        }
        if self.status.is_some_and(|status| vehicle.status != status) {
            return false;
        }
        if self.min_price.is_some_and(|min| vehicle.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| vehicle.price > max) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicles::test_support::vehicle;

    #[test]
    fn test_page_offsets() {
        assert_eq!(Pagination::page(1, 10), Pagination::new(0, 10));
        assert_eq!(Pagination::page(4, 5), Pagination::new(15, 5));
        // page zero behaves like page one
        assert_eq!(Pagination::page(0, 10).offset, 0);
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let v = vehicle("VF1AAAAA555000001", "Renault", 12_000);
        assert!(VehicleFilter::default().matches(&v));
    }

    #[test]
    fn test_brand_filter_is_case_insensitive() {
        let v = vehicle("VF1AAAAA555000001", "Renault", 12_000);
        let filter = VehicleFilter {
            brand: Some("renault".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&v));

        let filter = VehicleFilter {
            brand: Some("Peugeot".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&v));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let v = vehicle("VF1AAAAA555000001", "Renault", 12_000);
        let filter = VehicleFilter {
            min_price: Some(12_000),
            max_price: Some(12_000),
            ..Default::default()
        };
        assert!(filter.matches(&v));

        let filter = VehicleFilter {
            min_price: Some(12_001),
            ..Default::default()
        };
        assert!(!filter.matches(&v));
    }

    #[test]
    fn test_sort_breaks_ties_by_vin() {
        let a = vehicle("AAAAAAAAAAAAAAAA1", "Fiat", 5_000);
        let b = vehicle("BBBBBBBBBBBBBBBB2", "Fiat", 5_000);
        let sort = VehicleSort::new(SortField::Price, OrderDirection::Descending);
        assert_eq!(sort.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_sort_direction() {
        let cheap = vehicle("AAAAAAAAAAAAAAAA1", "Fiat", 5_000);
        let pricey = vehicle("BBBBBBBBBBBBBBBB2", "Audi", 50_000);
        let asc = VehicleSort::new(SortField::Price, OrderDirection::Ascending);
        let desc = VehicleSort::new(SortField::Price, OrderDirection::Descending);
        assert_eq!(asc.compare(&cheap, &pricey), Ordering::Less);
        assert_eq!(desc.compare(&cheap, &pricey), Ordering::Greater);
    }

    #[test]
    fn test_sort_display() {
        assert_eq!(VehicleSort::default().to_string(), "created_at desc");
    }
}
