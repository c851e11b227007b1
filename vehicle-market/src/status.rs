//! Status code resolution for service results
//!
//! Controllers never pick failure status codes themselves. They hand the
//! [`ServiceResult`] produced by the domain service to [`resolve_status`]
//! together with the status they want on success, and the resolver applies
//! these rules in order (first match wins):
//!
//! 1. failure whose `error` contains `"not found"` → **404 Not Found**
//! 2. failure with a non-empty `errors` map → **422 Unprocessable Entity**
//! 3. any other failure → **400 Bad Request**
//! 4. success → the requested success status (200 unless the caller asked
//!    for something else, e.g. 201 for creation)
//!
//! # Example
//!
//! ```rust
//! use axum::http::StatusCode;
//! use vehicle_market::responses::ServiceResult;
//! use vehicle_market::status::resolve_status;
//!
//! let missing: ServiceResult<()> = ServiceResult::failure("Vehicle not found");
//! assert_eq!(resolve_status(&missing, StatusCode::OK), StatusCode::NOT_FOUND);
//!
//! let created = ServiceResult::ok(42);
//! assert_eq!(resolve_status(&created, StatusCode::CREATED), StatusCode::CREATED);
//! ```

use axum::http::StatusCode;

use crate::responses::ServiceResult;

/// Substring marking a failure as "not found"
///
/// Matched case-sensitively anywhere in the error message.
pub const NOT_FOUND_MARKER: &str = "not found";

/// Pick the HTTP status code for a service result
pub fn resolve_status<T>(result: &ServiceResult<T>, success_status: StatusCode) -> StatusCode {
    if !result.success {
        if is_not_found(result) {
            return StatusCode::NOT_FOUND;
        }
        if has_field_errors(result) {
            return StatusCode::UNPROCESSABLE_ENTITY;
        }
        return StatusCode::BAD_REQUEST;
    }

    success_status
}

/// Whether the failure message reports a missing resource
///
/// Checked before field errors: a result carrying both resolves to 404.
fn is_not_found<T>(result: &ServiceResult<T>) -> bool {
    result
        .error
        .as_deref()
        .is_some_and(|message| message.contains(NOT_FOUND_MARKER))
}

fn has_field_errors<T>(result: &ServiceResult<T>) -> bool {
    result.errors.as_ref().is_some_and(|errors| !errors.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responses::FieldErrors;

    fn field_errors() -> FieldErrors {
        FieldErrors::from([("price".to_string(), "Price is required".to_string())])
    }

    #[test]
    fn test_success_with_default_status_is_ok() {
        let result = ServiceResult::ok("payload");
        assert_eq!(resolve_status(&result, StatusCode::OK), StatusCode::OK);
    }

    #[test]
    fn test_success_keeps_custom_status() {
        let result = ServiceResult::ok("payload");
        for status in [
            StatusCode::CREATED,
            StatusCode::ACCEPTED,
            StatusCode::NO_CONTENT,
            StatusCode::PARTIAL_CONTENT,
        ] {
            assert_eq!(resolve_status(&result, status), status);
        }
    }

    #[test]
    fn test_not_found_message() {
        let result: ServiceResult<()> = ServiceResult::failure("Vehicle not found");
        assert_eq!(resolve_status(&result, StatusCode::OK), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_not_found_wins_over_field_errors() {
        let result: ServiceResult<()> =
            ServiceResult::failure("Vehicle not found").with_errors(field_errors());
        assert_eq!(resolve_status(&result, StatusCode::OK), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_not_found_ignores_success_status() {
        let result: ServiceResult<()> = ServiceResult::failure("Vehicle not found");
        assert_eq!(
            resolve_status(&result, StatusCode::CREATED),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_not_found_match_is_case_sensitive() {
        let result: ServiceResult<()> = ServiceResult::failure("Vehicle Not Found");
        assert_eq!(resolve_status(&result, StatusCode::OK), StatusCode::BAD_REQUEST);

        let result: ServiceResult<()> = ServiceResult::failure("NOT FOUND");
        assert_eq!(resolve_status(&result, StatusCode::OK), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_is_plain_substring() {
        // no word-boundary handling
        let result: ServiceResult<()> = ServiceResult::failure("owner was not foundational");
        assert_eq!(resolve_status(&result, StatusCode::OK), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_field_errors_are_unprocessable() {
        let result: ServiceResult<()> = ServiceResult::invalid(field_errors());
        assert_eq!(
            resolve_status(&result, StatusCode::OK),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_field_errors_with_generic_message_are_unprocessable() {
        let result: ServiceResult<()> =
            ServiceResult::failure("Validation failed").with_errors(field_errors());
        assert_eq!(
            resolve_status(&result, StatusCode::OK),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_empty_field_errors_count_as_generic_failure() {
        let result: ServiceResult<()> = ServiceResult::invalid(FieldErrors::new());
        assert_eq!(resolve_status(&result, StatusCode::OK), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_generic_failure_is_bad_request() {
        let result: ServiceResult<()> = ServiceResult::failure("Generic error");
        assert_eq!(resolve_status(&result, StatusCode::OK), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_failure_without_message_is_bad_request() {
        let result: ServiceResult<()> = ServiceResult {
            success: false,
            error: None,
            errors: None,
            data: None,
        };
        assert_eq!(resolve_status(&result, StatusCode::OK), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_success_ignores_stray_error_fields() {
        let result = ServiceResult {
            success: true,
            error: Some("Vehicle not found".to_string()),
            errors: Some(field_errors()),
            data: Some(1),
        };
        assert_eq!(resolve_status(&result, StatusCode::OK), StatusCode::OK);
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let result: ServiceResult<()> =
            ServiceResult::failure("Vehicle not found").with_errors(field_errors());
        let first = resolve_status(&result, StatusCode::OK);
        let second = resolve_status(&result, StatusCode::OK);
        assert_eq!(first, second);
    }
}
