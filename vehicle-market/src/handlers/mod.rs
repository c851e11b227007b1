//! HTTP handlers for the vehicle catalogue
//!
//! # Integration with Axum
//!
//! Every handler returns `Result<ApiResponse<_>>`, so failed service results
//! get their status from [`resolve_status`](crate::status::resolve_status)
//! and storage failures render as 500:
//!
//! ```rust,ignore
//! async fn get_vehicle(
//!     State(state): State<AppState>,
//!     Path(id): Path<String>,
//! ) -> Result<ApiResponse<Vehicle>> {
//!     let result = state.vehicles().get(&id).await?;
//!     Ok(ApiResponse::ok(result))
//! }
//! ```

mod query;
mod vehicles;

// Re-export all public types
pub use query::ListQuery;
pub use vehicles::{
    create_vehicle, delete_vehicle, get_vehicle, list_vehicles, sell_vehicle, update_vehicle,
};
