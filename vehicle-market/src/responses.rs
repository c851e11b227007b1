//! Service results and their HTTP rendering
//!
//! Every domain operation returns a [`ServiceResult`]: a success flag plus
//! either a payload, a single error message, or a map of field errors. The
//! JSON shape is fixed (`success`, `error`, `errors`, `data`) and absent
//! members are omitted.
//!
//! [`ApiResponse`] is the writer controllers return: it pairs a result with
//! the status to use on success and lets [`resolve_status`] choose the actual
//! code.
//!
//! ## Example
//!
//! ```rust
//! use axum::http::StatusCode;
//! use vehicle_market::responses::{ApiResponse, ServiceResult};
//!
//! let response = ApiResponse::created(ServiceResult::ok("listed"));
//! assert_eq!(response.status(), StatusCode::CREATED);
//!
//! let body = serde_json::to_value(response.result()).unwrap();
//! assert_eq!(body, serde_json::json!({ "success": true, "data": "listed" }));
//! ```

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::status::resolve_status;

/// Field name → human-readable message
pub type FieldErrors = BTreeMap<String, String>;

/// Outcome of a domain service operation
///
/// `success` is mandatory when deserializing; a payload without it is
/// rejected rather than guessed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResult<T> {
    /// Whether the operation succeeded
    pub success: bool,

    /// Single failure reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Field-level validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,

    /// Payload of a successful operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ServiceResult<T> {
    /// Successful result carrying a payload
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            error: None,
            errors: None,
            data: Some(data),
        }
    }

    /// Failed result with a single message
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            errors: None,
            data: None,
        }
    }

    /// Failed result for a missing entity, e.g. `"Vehicle not found"`
    pub fn not_found(entity: &str) -> Self {
        Self::failure(format!("{} not found", entity))
    }

    /// Failed result with field-level errors
    pub fn invalid(errors: FieldErrors) -> Self {
        Self {
            success: false,
            error: None,
            errors: Some(errors),
            data: None,
        }
    }

    /// Attach field errors to an existing result
    #[must_use]
    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Whether the operation succeeded
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Map the payload to a new type
    pub fn map<U, F>(self, f: F) -> ServiceResult<U>
    where
        F: FnOnce(T) -> U,
    {
        ServiceResult {
            success: self.success,
            error: self.error,
            errors: self.errors,
            data: self.data.map(f),
        }
    }
}

/// HTTP response for a service result
///
/// The body is the serialized result; the status comes from
/// [`resolve_status`].
#[derive(Debug)]
pub struct ApiResponse<T> {
    result: ServiceResult<T>,
    success_status: StatusCode,
}

impl<T> ApiResponse<T> {
    /// Render `result`, using `success_status` if it succeeded
    pub fn new(result: ServiceResult<T>, success_status: StatusCode) -> Self {
        Self {
            result,
            success_status,
        }
    }

    /// Render with 200 OK on success
    pub fn ok(result: ServiceResult<T>) -> Self {
        Self::new(result, StatusCode::OK)
    }

    /// Render with 201 Created on success
    pub fn created(result: ServiceResult<T>) -> Self {
        Self::new(result, StatusCode::CREATED)
    }

    /// Resolved status code
    pub fn status(&self) -> StatusCode {
        resolve_status(&self.result, self.success_status)
    }

    /// The wrapped result
    pub fn result(&self) -> &ServiceResult<T> {
        &self.result
    }

    /// Unwrap into the service result
    pub fn into_result(self) -> ServiceResult<T> {
        self.result
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status();
        if !self.result.success {
            tracing::debug!(
                status = status.as_u16(),
                error = ?self.result.error,
                field_errors = self.result.errors.as_ref().map_or(0, BTreeMap::len),
                "Service operation failed"
            );
        }
        (status, Json(self.result)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_serializes_success_and_data_only() {
        let body = serde_json::to_value(ServiceResult::ok(json!({ "id": 1 }))).unwrap();
        assert_eq!(body, json!({ "success": true, "data": { "id": 1 } }));
    }

    #[test]
    fn test_failure_serializes_error_only() {
        let result: ServiceResult<()> = ServiceResult::failure("Vehicle not found");
        let body = serde_json::to_value(result).unwrap();
        assert_eq!(body, json!({ "success": false, "error": "Vehicle not found" }));
    }

    #[test]
    fn test_invalid_serializes_field_errors() {
        let errors = FieldErrors::from([
            ("vin".to_string(), "VIN is required".to_string()),
            ("brand".to_string(), "Brand is required".to_string()),
        ]);
        let result: ServiceResult<()> = ServiceResult::invalid(errors);
        let body = serde_json::to_value(result).unwrap();
        assert_eq!(
            body,
            json!({
                "success": false,
                "errors": { "brand": "Brand is required", "vin": "VIN is required" }
            })
        );
    }

    #[test]
    fn test_deserialize_requires_success() {
        let missing = serde_json::from_str::<ServiceResult<u32>>(r#"{ "data": 1 }"#);
        assert!(missing.is_err());

        let present: ServiceResult<u32> =
            serde_json::from_str(r#"{ "success": true, "data": 1 }"#).unwrap();
        assert_eq!(present, ServiceResult::ok(1));
    }

    #[test]
    fn test_map_keeps_failure_fields() {
        let result: ServiceResult<u32> = ServiceResult::failure("nope");
        let mapped = result.map(|n| n.to_string());
        assert!(!mapped.is_success());
        assert_eq!(mapped.error.as_deref(), Some("nope"));
        assert!(mapped.data.is_none());
    }

    #[test]
    fn test_api_response_statuses() {
        assert_eq!(ApiResponse::ok(ServiceResult::ok(1)).status(), StatusCode::OK);
        assert_eq!(
            ApiResponse::created(ServiceResult::ok(1)).status(),
            StatusCode::CREATED
        );
        let failed: ServiceResult<u32> = ServiceResult::failure("Vehicle not found");
        assert_eq!(ApiResponse::created(failed).status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_into_response_writes_status_and_body() {
        let result: ServiceResult<u32> = ServiceResult::invalid(FieldErrors::from([(
            "price".to_string(),
            "Price must be greater than zero".to_string(),
        )]));
        let response = ApiResponse::ok(result).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"]["price"], "Price must be greater than zero");
    }
}
