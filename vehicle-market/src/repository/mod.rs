//! Vehicle storage abstraction
//!
//! - [`VehicleRepository`]: async CRUD trait the domain service depends on
//! - [`InMemoryVehicleRepository`]: concurrent process-local implementation
//! - [`VehicleFilter`], [`VehicleSort`], [`Pagination`]: query shaping
//! - [`RepositoryError`]: structured failures with operation context

mod error;
mod memory;
mod pagination;
mod traits;

// Re-export all public types
pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::InMemoryVehicleRepository;
pub use pagination::{OrderDirection, Pagination, SortField, VehicleFilter, VehicleSort};
pub use traits::{RepositoryResult, VehicleRepository};
