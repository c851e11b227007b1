//! In-memory vehicle repository
//!
//! Backed by two concurrent maps: vehicles by ID and a VIN index that keeps
//! VINs unique without a global lock.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{Pagination, VehicleFilter, VehicleSort};
use super::traits::{RepositoryResult, VehicleRepository};
use crate::vehicles::Vehicle;

const ENTITY: &str = "Vehicle";

/// Process-local vehicle store
#[derive(Debug, Default)]
pub struct InMemoryVehicleRepository {
    vehicles: DashMap<Uuid, Vehicle>,
    vins: DashMap<String, Uuid>,
}

impl InMemoryVehicleRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored vehicles
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

impl VehicleRepository for InMemoryVehicleRepository {
    async fn find_by_id(&self, id: &Uuid) -> RepositoryResult<Option<Vehicle>> {
        Ok(self.vehicles.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_vin(&self, vin: &str) -> RepositoryResult<Option<Vehicle>> {
        let Some(id) = self.vins.get(vin).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.vehicles.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_all(
        &self,
        filter: &VehicleFilter,
        sort: VehicleSort,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<Vec<Vehicle>> {
        let mut matching: Vec<Vehicle> = self
            .vehicles
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        matching.sort_by(|a, b| sort.compare(a, b));

        let Some(pagination) = pagination else {
            return Ok(matching);
        };

        let offset = usize::try_from(pagination.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit).unwrap_or(usize::MAX);
        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, filter: &VehicleFilter) -> RepositoryResult<u64> {
        let count = self
            .vehicles
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .count();
        Ok(count as u64)
    }

    async fn create(&self, vehicle: Vehicle) -> RepositoryResult<Vehicle> {
        match self.vins.entry(vehicle.vin.clone()) {
            Entry::Occupied(_) => {
                return Err(RepositoryError::already_exists(ENTITY, vehicle.vin));
            }
            Entry::Vacant(slot) => {
                slot.insert(vehicle.id);
            }
        }

        self.vehicles.insert(vehicle.id, vehicle.clone());
        tracing::debug!(vehicle_id = %vehicle.id, vin = %vehicle.vin, "Vehicle stored");
        Ok(vehicle)
    }

    async fn update_with<F, E>(
        &self,
        id: &Uuid,
        change: F,
    ) -> RepositoryResult<std::result::Result<Vehicle, E>>
    where
        F: FnOnce(&Vehicle) -> std::result::Result<Vehicle, E> + Send,
        E: Send,
    {
        // the shard write lock is held from read to write
        let Some(mut stored) = self.vehicles.get_mut(id) else {
            return Err(RepositoryError::not_found(ENTITY, id.to_string())
                .with_operation(RepositoryOperation::Update));
        };

        match change(stored.value()) {
            Ok(mut next) => {
                next.id = *id;
                next.vin = stored.vin.clone();
                *stored = next.clone();
                Ok(Ok(next))
            }
            Err(refusal) => Ok(Err(refusal)),
        }
    }

    async fn delete(&self, id: &Uuid) -> RepositoryResult<bool> {
        match self.vehicles.remove(id) {
            Some((_, vehicle)) => {
                self.vins.remove(&vehicle.vin);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
