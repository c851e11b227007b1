//! Vehicle catalogue domain
//!
//! - [`Vehicle`] and its enums: the listing model
//! - [`NewVehicle`] / [`VehicleChanges`]: validated input payloads
//! - [`VehicleService`]: catalogue operations producing
//!   [`ServiceResult`](crate::responses::ServiceResult)s

mod models;
mod service;

pub use models::{
    normalize_vin, FuelType, NewVehicle, ParseVariantError, Vehicle, VehicleChanges,
    VehicleStatus, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, MIN_YEAR,
};
pub use service::{
    DeletedVehicle, VehiclePage, VehicleService, ALREADY_SOLD, INVALID_ID, INVALID_PRICE_RANGE,
    NO_CHANGES, SOLD_IS_FINAL,
};
