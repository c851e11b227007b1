//! Vehicle listing model and input validation

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::responses::FieldErrors;

/// VINs are 17 characters; I, O and Q are excluded to avoid confusion with 1 and 0
static VIN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").expect("VIN regex is valid"));

/// Maximum length of brand and model names
pub const MAX_NAME_LENGTH: usize = 64;

/// Maximum length of a listing description
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Oldest accepted model year
pub const MIN_YEAR: u16 = 1900;

/// Error parsing a fuel type or status from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseVariantError {
    kind: &'static str,
    value: String,
}

/// Fuel a vehicle runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
    Lpg,
}

impl FuelType {
    /// Every fuel type, in display order
    pub const ALL: [FuelType; 5] = [
        Self::Petrol,
        Self::Diesel,
        Self::Electric,
        Self::Hybrid,
        Self::Lpg,
    ];

    /// Lowercase wire name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Petrol => "petrol",
            Self::Diesel => "diesel",
            Self::Electric => "electric",
            Self::Hybrid => "hybrid",
            Self::Lpg => "lpg",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuelType {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|fuel| fuel.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseVariantError {
                kind: "fuel type",
                value: s.to_string(),
            })
    }
}

/// Where a listing is in its sale lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    /// Open for offers
    #[default]
    Available,
    /// Held for a buyer
    Reserved,
    /// Sold; the listing can no longer change
    Sold,
}

impl VehicleStatus {
    /// Lowercase wire name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Sold => "sold",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Available, Self::Reserved, Self::Sold]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseVariantError {
                kind: "vehicle status",
                value: s.to_string(),
            })
    }
}

/// A vehicle listed on the marketplace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    /// Normalized (uppercase) vehicle identification number
    pub vin: String,
    pub brand: String,
    pub model: String,
    /// Model year
    pub year: u16,
    /// Asking price in whole currency units
    pub price: u64,
    /// Odometer reading in kilometres
    pub mileage: u32,
    pub fuel: FuelType,
    pub status: VehicleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Whether the vehicle has been sold
    pub fn is_sold(&self) -> bool {
        self.status == VehicleStatus::Sold
    }
}

/// Payload for listing a new vehicle
///
/// Every field is optional at the wire level so that missing values are
/// reported as field errors rather than rejected as malformed JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewVehicle {
    pub vin: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<u16>,
    pub price: Option<u64>,
    pub mileage: Option<u32>,
    pub fuel: Option<String>,
    pub description: Option<String>,
}

impl NewVehicle {
    /// Validate the payload into a vehicle created at `now`
    ///
    /// Collects every failing field instead of stopping at the first.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chrono::Utc;
    /// use vehicle_market::vehicles::NewVehicle;
    ///
    /// let input = NewVehicle {
    ///     vin: Some("wba3a5c51cf256985".to_string()),
    ///     brand: Some("BMW".to_string()),
    ///     model: Some("320d".to_string()),
    ///     year: Some(2019),
    ///     price: Some(21_500),
    ///     fuel: Some("diesel".to_string()),
    ///     ..Default::default()
    /// };
    /// let vehicle = input.build(Utc::now()).unwrap();
    /// assert_eq!(vehicle.vin, "WBA3A5C51CF256985");
    ///
    /// let errors = vehicle_market::vehicles::NewVehicle::default()
    ///     .build(Utc::now())
    ///     .unwrap_err();
    /// assert!(errors.contains_key("vin"));
    /// assert!(errors.contains_key("price"));
    /// ```
    pub fn build(self, now: DateTime<Utc>) -> Result<Vehicle, FieldErrors> {
        let mut errors = FieldErrors::new();

        let vin = required(&mut errors, "vin", "VIN", self.vin, validate_vin);
        let brand = required(&mut errors, "brand", "Brand", self.brand, |v| {
            validate_name("Brand", v)
        });
        let model = required(&mut errors, "model", "Model", self.model, |v| {
            validate_name("Model", v)
        });
        let year = required(&mut errors, "year", "Year", self.year, |v| {
            validate_year(v, now)
        });
        let price = required(&mut errors, "price", "Price", self.price, validate_price);
        let fuel = required(&mut errors, "fuel", "Fuel", self.fuel, validate_fuel);
        let description = match self.description.map(validate_description).transpose() {
            Ok(description) => description.flatten(),
            Err(message) => {
                errors.insert("description".to_string(), message);
                None
            }
        };

        match (vin, brand, model, year, price, fuel) {
            (Some(vin), Some(brand), Some(model), Some(year), Some(price), Some(fuel))
                if errors.is_empty() =>
            {
                Ok(Vehicle {
                    id: Uuid::new_v4(),
                    vin,
                    brand,
                    model,
                    year,
                    price,
                    mileage: self.mileage.unwrap_or(0),
                    fuel,
                    status: VehicleStatus::Available,
                    description,
                    created_at: now,
                    updated_at: now,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Partial update of a listing; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleChanges {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<u16>,
    pub price: Option<u64>,
    pub mileage: Option<u32>,
    pub fuel: Option<String>,
    /// An empty description clears the current one
    pub description: Option<String>,
    pub status: Option<String>,
}

impl VehicleChanges {
    /// Whether no field would change
    pub fn is_empty(&self) -> bool {
        self.brand.is_none()
            && self.model.is_none()
            && self.year.is_none()
            && self.price.is_none()
            && self.mileage.is_none()
            && self.fuel.is_none()
            && self.description.is_none()
            && self.status.is_none()
    }

    /// Apply the changes to `current`, producing the updated vehicle
    ///
    /// Mileage may not go down and status may only move between
    /// `available` and `reserved`; selling has its own operation.
    pub fn apply(self, current: &Vehicle, now: DateTime<Utc>) -> Result<Vehicle, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut updated = current.clone();

        if let Some(brand) = self.brand {
            collect(&mut errors, "brand", validate_name("Brand", brand), |v| {
                updated.brand = v
            });
        }
        if let Some(model) = self.model {
            collect(&mut errors, "model", validate_name("Model", model), |v| {
                updated.model = v
            });
        }
        if let Some(year) = self.year {
            collect(&mut errors, "year", validate_year(year, now), |v| {
                updated.year = v
            });
        }
        if let Some(price) = self.price {
            collect(&mut errors, "price", validate_price(price), |v| {
                updated.price = v
            });
        }
        if let Some(mileage) = self.mileage {
            let checked = if mileage < current.mileage {
                Err("Mileage cannot decrease".to_string())
            } else {
                Ok(mileage)
            };
            collect(&mut errors, "mileage", checked, |v| updated.mileage = v);
        }
        if let Some(fuel) = self.fuel {
            collect(&mut errors, "fuel", validate_fuel(fuel), |v| updated.fuel = v);
        }
        if let Some(description) = self.description {
            collect(
                &mut errors,
                "description",
                validate_description(description),
                |v| updated.description = v,
            );
        }
        if let Some(status) = self.status {
            collect(&mut errors, "status", validate_status_change(&status), |v| {
                updated.status = v
            });
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        updated.updated_at = now;
        Ok(updated)
    }
}

// ============================================================================
// Field validation
// ============================================================================

fn required<T, U>(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: Option<T>,
    validate: impl FnOnce(T) -> Result<U, String>,
) -> Option<U> {
    let Some(value) = value else {
        errors.insert(field.to_string(), format!("{} is required", label));
        return None;
    };
    match validate(value) {
        Ok(valid) => Some(valid),
        Err(message) => {
            errors.insert(field.to_string(), message);
            None
        }
    }
}

fn collect<T>(
    errors: &mut FieldErrors,
    field: &str,
    result: Result<T, String>,
    apply: impl FnOnce(T),
) {
    match result {
        Ok(value) => apply(value),
        Err(message) => {
            errors.insert(field.to_string(), message);
        }
    }
}

/// Trim and uppercase a VIN, then check its format
pub fn normalize_vin(vin: &str) -> Result<String, String> {
    let normalized = vin.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        return Err("VIN is required".to_string());
    }
    if !VIN_REGEX.is_match(&normalized) {
        return Err("VIN must be 17 letters or digits, excluding I, O and Q".to_string());
    }
    Ok(normalized)
}

fn validate_vin(vin: String) -> Result<String, String> {
    normalize_vin(&vin)
}

fn validate_name(label: &str, value: String) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} is required", label));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "{} must be at most {} characters",
            label, MAX_NAME_LENGTH
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_year(year: u16, now: DateTime<Utc>) -> Result<u16, String> {
    // next year's models go on sale before the calendar turns
    let latest = u16::try_from(now.year() + 1).unwrap_or(u16::MAX);
    if !(MIN_YEAR..=latest).contains(&year) {
        return Err(format!("Year must be between {} and {}", MIN_YEAR, latest));
    }
    Ok(year)
}

fn validate_price(price: u64) -> Result<u64, String> {
    if price == 0 {
        return Err("Price must be greater than zero".to_string());
    }
    Ok(price)
}

fn validate_fuel(fuel: String) -> Result<FuelType, String> {
    fuel.parse::<FuelType>().map_err(|_| {
        let names: Vec<&str> = FuelType::ALL.iter().map(FuelType::as_str).collect();
        format!("Fuel must be one of: {}", names.join(", "))
    })
}

fn validate_description(description: String) -> Result<Option<String>, String> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(format!(
            "Description must be at most {} characters",
            MAX_DESCRIPTION_LENGTH
        ));
    }
    Ok(Some(trimmed.to_string()))
}

fn validate_status_change(status: &str) -> Result<VehicleStatus, String> {
    match status.parse::<VehicleStatus>() {
        Ok(VehicleStatus::Sold) => Err("Use the sell operation to mark a vehicle sold".to_string()),
        Ok(status) => Ok(status),
        Err(_) => Err("Status must be one of: available, reserved".to_string()),
    }
}
