//! Vehicle endpoints
//!
//! Handlers only extract the request, call [`VehicleService`] and wrap the
//! result in an [`ApiResponse`]; status codes come from the resolver.
//!
//! [`VehicleService`]: crate::vehicles::VehicleService

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::Result;
use crate::responses::ApiResponse;
use crate::state::AppState;
use crate::vehicles::{DeletedVehicle, NewVehicle, Vehicle, VehicleChanges, VehiclePage};

use super::ListQuery;

/// `GET /api/v1/vehicles`
pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<VehiclePage>> {
    let result = state.vehicles().list(&query).await?;
    Ok(ApiResponse::ok(result))
}

/// `GET /api/v1/vehicles/{id}`
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Vehicle>> {
    let result = state.vehicles().get(&id).await?;
    Ok(ApiResponse::ok(result))
}

/// `POST /api/v1/vehicles`, 201 on success
pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(input): Json<NewVehicle>,
) -> Result<ApiResponse<Vehicle>> {
    let result = state.vehicles().create(input).await?;
    Ok(ApiResponse::created(result))
}

/// `PUT /api/v1/vehicles/{id}`
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(changes): Json<VehicleChanges>,
) -> Result<ApiResponse<Vehicle>> {
    let result = state.vehicles().update(&id, changes).await?;
    Ok(ApiResponse::ok(result))
}

/// `POST /api/v1/vehicles/{id}/sell`
pub async fn sell_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Vehicle>> {
    let result = state.vehicles().mark_sold(&id).await?;
    Ok(ApiResponse::ok(result))
}

/// `DELETE /api/v1/vehicles/{id}`
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<DeletedVehicle>> {
    let result = state.vehicles().delete(&id).await?;
    Ok(ApiResponse::ok(result))
}
