//! Vehicle catalogue operations
//!
//! Every operation returns `Result<ServiceResult<_>>`: expected outcomes
//! (missing vehicle, invalid input, forbidden transition) are failed
//! [`ServiceResult`]s, while the outer [`Error`](crate::error::Error) is
//! reserved for storage failures and broken invariants.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PaginationConfig;
use crate::error::Result;
use crate::handlers::ListQuery;
use crate::pagination::{last_page, PaginationMetadata, PaginationView};
use crate::repository::{Pagination, RepositoryErrorKind, RepositoryResult, VehicleRepository};
use crate::responses::{FieldErrors, ServiceResult};

use super::models::{NewVehicle, Vehicle, VehicleChanges, VehicleStatus};

const ENTITY: &str = "Vehicle";

/// Failure message for ids that are not UUIDs
pub const INVALID_ID: &str = "Invalid vehicle id";

/// Failure message for an update without fields
pub const NO_CHANGES: &str = "No changes provided";

/// Failure message when selling a sold vehicle
pub const ALREADY_SOLD: &str = "Vehicle is already sold";

/// Failure message when editing a sold vehicle
pub const SOLD_IS_FINAL: &str = "Sold vehicles cannot be edited";

/// Failure message for a minimum price above the maximum
pub const INVALID_PRICE_RANGE: &str = "min_price must not exceed max_price";

const DUPLICATE_VIN: &str = "A vehicle with this VIN is already listed";

/// One page of the vehicle listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehiclePage {
    pub items: Vec<Vehicle>,
    pub pagination: PaginationView,
}

/// Payload returned after a deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedVehicle {
    pub id: Uuid,
}

/// Vehicle catalogue backed by a [`VehicleRepository`]
#[derive(Debug)]
pub struct VehicleService<R> {
    repository: R,
    pagination: PaginationConfig,
}

impl<R: VehicleRepository> VehicleService<R> {
    /// Create a service over `repository`
    pub fn new(repository: R, pagination: PaginationConfig) -> Self {
        Self {
            repository,
            pagination,
        }
    }

    /// The underlying repository
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Pagination settings used by [`list`](Self::list)
    pub fn pagination_config(&self) -> &PaginationConfig {
        &self.pagination
    }

    /// List vehicles matching `query`, one page at a time
    ///
    /// A page past the end is clamped to the last page so the response
    /// always describes a page that exists.
    pub async fn list(&self, query: &ListQuery) -> Result<ServiceResult<VehiclePage>> {
        if query.has_inverted_price_range() {
            return Ok(ServiceResult::failure(INVALID_PRICE_RANGE));
        }

        let filter = query.vehicle_filter();
        let sort = query.vehicle_sort();
        let per_page = query.items_per_page(&self.pagination);

        let total = self.repository.count(&filter).await?;
        let page = query.page_number().min(last_page(total, per_page)?);

        let items = self
            .repository
            .find_all(
                &filter,
                sort,
                Some(Pagination::page(u64::from(page), u64::from(per_page))),
            )
            .await?;

        let metadata = PaginationMetadata::compute(total, per_page, page)?;
        tracing::debug!(
            total,
            page,
            per_page,
            returned = items.len(),
            sort = %sort,
            "Listed vehicles"
        );

        Ok(ServiceResult::ok(VehiclePage {
            items,
            pagination: PaginationView::new(metadata, self.pagination.max_visible_pages),
        }))
    }

    /// Fetch one vehicle by id
    pub async fn get(&self, id: &str) -> Result<ServiceResult<Vehicle>> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(ServiceResult::failure(INVALID_ID));
        };
        Ok(match self.repository.find_by_id(&id).await? {
            Some(vehicle) => ServiceResult::ok(vehicle),
            None => ServiceResult::not_found(ENTITY),
        })
    }

    /// List a new vehicle
    pub async fn create(&self, input: NewVehicle) -> Result<ServiceResult<Vehicle>> {
        let vehicle = match input.build(Utc::now()) {
            Ok(vehicle) => vehicle,
            Err(errors) => return Ok(ServiceResult::invalid(errors)),
        };

        if self.repository.find_by_vin(&vehicle.vin).await?.is_some() {
            return Ok(duplicate_vin());
        }

        match self.repository.create(vehicle).await {
            Ok(vehicle) => {
                tracing::info!(vehicle_id = %vehicle.id, vin = %vehicle.vin, "Vehicle listed");
                Ok(ServiceResult::ok(vehicle))
            }
            // lost a race with another listing of the same VIN
            Err(e) if e.kind == RepositoryErrorKind::AlreadyExists => Ok(duplicate_vin()),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply a partial update to a vehicle
    ///
    /// The sold check, validation and write happen as one step in the
    /// repository, so a concurrent sale is never overwritten.
    pub async fn update(&self, id: &str, changes: VehicleChanges) -> Result<ServiceResult<Vehicle>> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(ServiceResult::failure(INVALID_ID));
        };
        let now = Utc::now();
        let outcome = self
            .repository
            .update_with(&id, |current| {
                if current.is_sold() {
                    return Err(Refusal::Failure(SOLD_IS_FINAL));
                }
                if changes.is_empty() {
                    return Err(Refusal::Failure(NO_CHANGES));
                }
                changes.apply(current, now).map_err(Refusal::Invalid)
            })
            .await;
        settle(outcome)
    }

    /// Mark a vehicle as sold
    ///
    /// Of two concurrent sales of the same vehicle exactly one succeeds.
    pub async fn mark_sold(&self, id: &str) -> Result<ServiceResult<Vehicle>> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(ServiceResult::failure(INVALID_ID));
        };
        let now = Utc::now();
        let outcome = self
            .repository
            .update_with(&id, |current| {
                if current.is_sold() {
                    return Err(Refusal::Failure(ALREADY_SOLD));
                }
                let mut sold = current.clone();
                sold.status = VehicleStatus::Sold;
                sold.updated_at = now;
                Ok(sold)
            })
            .await;

        let result = settle(outcome)?;
        if let Some(sold) = &result.data {
            tracing::info!(vehicle_id = %sold.id, price = sold.price, "Vehicle sold");
        }
        Ok(result)
    }

    /// Remove a listing
    pub async fn delete(&self, id: &str) -> Result<ServiceResult<DeletedVehicle>> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(ServiceResult::failure(INVALID_ID));
        };
        if !self.repository.delete(&id).await? {
            return Ok(ServiceResult::not_found(ENTITY));
        }
        tracing::info!(vehicle_id = %id, "Vehicle removed");
        Ok(ServiceResult::ok(DeletedVehicle { id }))
    }
}

/// Reason a guarded write left the stored vehicle untouched
#[derive(Debug)]
enum Refusal {
    Failure(&'static str),
    Invalid(FieldErrors),
}

/// Turn the outcome of a guarded write into a service result
///
/// A vehicle deleted before the write counts as not found.
fn settle(
    outcome: RepositoryResult<std::result::Result<Vehicle, Refusal>>,
) -> Result<ServiceResult<Vehicle>> {
    match outcome {
        Ok(Ok(vehicle)) => Ok(ServiceResult::ok(vehicle)),
        Ok(Err(Refusal::Failure(message))) => Ok(ServiceResult::failure(message)),
        Ok(Err(Refusal::Invalid(errors))) => Ok(ServiceResult::invalid(errors)),
        Err(e) if e.kind == RepositoryErrorKind::NotFound => Ok(ServiceResult::not_found(ENTITY)),
        Err(e) => Err(e.into()),
    }
}

fn duplicate_vin<T>() -> ServiceResult<T> {
    ServiceResult::invalid(FieldErrors::from([(
        "vin".to_string(),
        DUPLICATE_VIN.to_string(),
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Barrier;

    use crate::pagination::PageItem;
    use crate::repository::InMemoryVehicleRepository;

    fn service() -> VehicleService<InMemoryVehicleRepository> {
        VehicleService::new(InMemoryVehicleRepository::new(), PaginationConfig::default())
    }

    fn input(vin: &str, brand: &str, price: u64) -> NewVehicle {
        NewVehicle {
            vin: Some(vin.to_string()),
            brand: Some(brand.to_string()),
            model: Some("Golf".to_string()),
            year: Some(2018),
            price: Some(price),
            mileage: Some(80_000),
            fuel: Some("petrol".to_string()),
            description: None,
        }
    }

    fn vin(n: usize) -> String {
        format!("WVWZZZ1KZ8W{:06}", n)
    }

    async fn listed(service: &VehicleService<InMemoryVehicleRepository>) -> Vehicle {
        service
            .create(input(&vin(1), "Volkswagen", 9_500))
            .await
            .unwrap()
            .data
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();
        let created = service.create(input(&vin(1), "Volkswagen", 9_500)).await.unwrap();
        assert!(created.is_success());
        let vehicle = created.data.unwrap();
        assert_eq!(vehicle.status, VehicleStatus::Available);

        let fetched = service.get(&vehicle.id.to_string()).await.unwrap();
        assert_eq!(fetched.data, Some(vehicle));
    }

    #[tokio::test]
    async fn test_create_invalid_reports_fields() {
        let result = service().create(NewVehicle::default()).await.unwrap();
        assert!(!result.is_success());
        let errors = result.errors.unwrap();
        assert!(errors.contains_key("vin"));
        assert!(errors.contains_key("price"));
    }

    #[tokio::test]
    async fn test_create_duplicate_vin() {
        let service = service();
        listed(&service).await;
        // same VIN in lowercase normalizes to the same value
        let result = service
            .create(input(&vin(1).to_lowercase(), "Volkswagen", 8_000))
            .await
            .unwrap();
        assert_eq!(result.errors.unwrap()["vin"], DUPLICATE_VIN);
        assert_eq!(service.repository().len(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_and_invalid_ids() {
        let service = service();
        let missing = service.get(&Uuid::new_v4().to_string()).await.unwrap();
        assert_eq!(missing.error.as_deref(), Some("Vehicle not found"));

        let invalid = service.get("not-a-uuid").await.unwrap();
        assert_eq!(invalid.error.as_deref(), Some(INVALID_ID));
    }

    #[tokio::test]
    async fn test_update() {
        let service = service();
        let vehicle = listed(&service).await;
        let id = vehicle.id.to_string();

        let empty = service.update(&id, VehicleChanges::default()).await.unwrap();
        assert_eq!(empty.error.as_deref(), Some(NO_CHANGES));

        let changes = VehicleChanges {
            price: Some(0),
            ..Default::default()
        };
        let invalid = service.update(&id, changes).await.unwrap();
        assert!(invalid.errors.unwrap().contains_key("price"));

        let changes = VehicleChanges {
            price: Some(8_900),
            ..Default::default()
        };
        let updated = service.update(&id, changes).await.unwrap().data.unwrap();
        assert_eq!(updated.price, 8_900);
        assert!(updated.updated_at >= vehicle.updated_at);
    }

    #[tokio::test]
    async fn test_sell_once() {
        let service = service();
        let id = listed(&service).await.id.to_string();

        let sold = service.mark_sold(&id).await.unwrap().data.unwrap();
        assert_eq!(sold.status, VehicleStatus::Sold);

        let again = service.mark_sold(&id).await.unwrap();
        assert_eq!(again.error.as_deref(), Some(ALREADY_SOLD));

        let changes = VehicleChanges {
            price: Some(1),
            ..Default::default()
        };
        let edit = service.update(&id, changes).await.unwrap();
        assert_eq!(edit.error.as_deref(), Some(SOLD_IS_FINAL));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sales_and_edit_keep_sold_final() {
        let service = Arc::new(service());

        for n in 0..200 {
            let id = service
                .create(input(&vin(n), "Opel", 7_000))
                .await
                .unwrap()
                .data
                .unwrap()
                .id
                .to_string();
            let barrier = Arc::new(Barrier::new(3));

            let sales: Vec<_> = (0..2)
                .map(|_| {
                    let (service, barrier, id) = (service.clone(), barrier.clone(), id.clone());
                    tokio::spawn(async move {
                        barrier.wait().await;
                        service.mark_sold(&id).await.unwrap().is_success()
                    })
                })
                .collect();
            let edit = {
                let (service, barrier, id) = (service.clone(), barrier.clone(), id.clone());
                tokio::spawn(async move {
                    barrier.wait().await;
                    let changes = VehicleChanges {
                        price: Some(6_500),
                        ..Default::default()
                    };
                    service.update(&id, changes).await.unwrap()
                })
            };

            let mut sold = 0;
            for sale in sales {
                if sale.await.unwrap() {
                    sold += 1;
                }
            }
            let edit = edit.await.unwrap();
            assert_eq!(sold, 1, "exactly one sale wins");

            let stored = service.get(&id).await.unwrap().data.unwrap();
            assert_eq!(stored.status, VehicleStatus::Sold);
            if edit.is_success() {
                assert_eq!(stored.price, 6_500);
            } else {
                assert_eq!(edit.error.as_deref(), Some(SOLD_IS_FINAL));
                assert_eq!(stored.price, 7_000);
            }
        }
    }

    #[tokio::test]
    async fn test_update_deleted_vehicle_is_not_found() {
        let service = service();
        let id = listed(&service).await.id.to_string();
        service.delete(&id).await.unwrap();

        let changes = VehicleChanges {
            price: Some(8_000),
            ..Default::default()
        };
        let result = service.update(&id, changes).await.unwrap();
        assert_eq!(result.error.as_deref(), Some("Vehicle not found"));
        let sale = service.mark_sold(&id).await.unwrap();
        assert_eq!(sale.error.as_deref(), Some("Vehicle not found"));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = service();
        let vehicle = listed(&service).await;
        let id = vehicle.id.to_string();

        let deleted = service.delete(&id).await.unwrap();
        assert_eq!(deleted.data, Some(DeletedVehicle { id: vehicle.id }));

        let again = service.delete(&id).await.unwrap();
        assert_eq!(again.error.as_deref(), Some("Vehicle not found"));
    }

    #[tokio::test]
    async fn test_list_pages() {
        let service = service();
        for n in 0..23 {
            service
                .create(input(&vin(n), "Skoda", 5_000 + n as u64 * 100))
                .await
                .unwrap();
        }

        let query = ListQuery::new().with_limit(5).with_page(3);
        let page = service.list(&query).await.unwrap().data.unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.pagination.metadata.current_page, 3);
        assert_eq!(page.pagination.metadata.last_page, 5);
        assert_eq!(page.pagination.metadata.total_results, 23);
        assert_eq!(
            page.pagination.pages,
            (1..=5).map(PageItem::Page).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_list_clamps_page_past_end() {
        let service = service();
        for n in 0..7 {
            service.create(input(&vin(n), "Seat", 4_000)).await.unwrap();
        }

        let query = ListQuery::new().with_limit(5).with_page(40);
        let page = service.list(&query).await.unwrap().data.unwrap();
        assert_eq!(page.pagination.metadata.current_page, 2);
        assert_eq!(page.items.len(), 2);
        assert!(!page.pagination.metadata.has_next_page);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let page = service().list(&ListQuery::new()).await.unwrap().data.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.metadata.last_page, 1);
        assert!(!page.pagination.metadata.has_to_paginate);
    }

    #[tokio::test]
    async fn test_list_rejects_inverted_price_range() {
        let query = ListQuery::new().with_price_range(Some(10_000), Some(5_000));
        let result = service().list(&query).await.unwrap();
        assert_eq!(result.error.as_deref(), Some(INVALID_PRICE_RANGE));
    }
}
