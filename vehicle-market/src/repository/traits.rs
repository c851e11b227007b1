//! Repository trait definitions
//!
//! Uses RPITIT (Return Position Impl Trait In Traits) so implementations can
//! write plain `async fn` without `async_trait`.

use std::future::Future;

use uuid::Uuid;

use super::error::RepositoryError;
use super::pagination::{Pagination, VehicleFilter, VehicleSort};
use crate::vehicles::Vehicle;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Storage operations for vehicle listings
///
/// Implementations must keep VINs unique: `create` fails with
/// `AlreadyExists` when the VIN is taken.
///
/// # Example
///
/// ```rust,ignore
/// use vehicle_market::repository::{Pagination, VehicleFilter, VehicleRepository, VehicleSort};
///
/// async fn first_page<R: VehicleRepository>(repo: &R) -> RepositoryResult<Vec<Vehicle>> {
///     repo.find_all(
///         &VehicleFilter::default(),
///         VehicleSort::default(),
///         Some(Pagination::page(1, 10)),
///     )
///     .await
/// }
/// ```
pub trait VehicleRepository: Send + Sync {
    /// Find a vehicle by its identifier
    ///
    /// Returns `Ok(None)` when no vehicle has that ID.
    fn find_by_id(
        &self,
        id: &Uuid,
    ) -> impl Future<Output = RepositoryResult<Option<Vehicle>>> + Send;

    /// Find a vehicle by its VIN
    fn find_by_vin(
        &self,
        vin: &str,
    ) -> impl Future<Output = RepositoryResult<Option<Vehicle>>> + Send;

    /// Find all vehicles matching the filter, ordered and optionally sliced
    fn find_all(
        &self,
        filter: &VehicleFilter,
        sort: VehicleSort,
        pagination: Option<Pagination>,
    ) -> impl Future<Output = RepositoryResult<Vec<Vehicle>>> + Send;

    /// Count vehicles matching the filter
    fn count(&self, filter: &VehicleFilter)
        -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Insert a new vehicle
    fn create(&self, vehicle: Vehicle) -> impl Future<Output = RepositoryResult<Vehicle>> + Send;

    /// Atomically replace a stored vehicle with the result of `change`
    ///
    /// `change` sees the current stored value and either returns its
    /// replacement or refuses with `E`; no other write to the same vehicle
    /// can interleave between the read and the write. The replacement must
    /// keep the ID and VIN. A refusal leaves the vehicle untouched and comes
    /// back as `Ok(Err(e))`.
    ///
    /// Fails with `NotFound` when the vehicle does not exist.
    fn update_with<F, E>(
        &self,
        id: &Uuid,
        change: F,
    ) -> impl Future<Output = RepositoryResult<std::result::Result<Vehicle, E>>> + Send
    where
        F: FnOnce(&Vehicle) -> std::result::Result<Vehicle, E> + Send,
        E: Send;

    /// Delete a vehicle, returning whether it existed
    fn delete(&self, id: &Uuid) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Check that the backing store is reachable
    fn ping(&self) -> impl Future<Output = RepositoryResult<()>> + Send;
}
