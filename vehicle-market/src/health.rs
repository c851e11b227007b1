//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::repository::{VehicleFilter, VehicleRepository};
use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses
    pub dependencies: HashMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dependency is healthy
    pub healthy: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Simple health check (liveness probe)
///
/// Always returns 200 OK if the service is running.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check (readiness probe)
///
/// Returns 200 OK when the vehicle repository answers a ping and
/// 503 Service Unavailable otherwise.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let repository = check_repository(state.vehicles().repository()).await;
    readiness_response(&state.config().service.name, repository)
}

/// Ping a repository and describe the outcome
async fn check_repository<R: VehicleRepository>(repository: &R) -> DependencyStatus {
    let outcome = match repository.ping().await {
        Ok(()) => repository.count(&VehicleFilter::default()).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(stored) => DependencyStatus {
            healthy: true,
            message: Some(format!("{} vehicles stored", stored)),
        },
        Err(e) => {
            tracing::error!(retriable = e.is_retriable(), "Repository health check failed: {}", e);
            DependencyStatus {
                healthy: false,
                message: Some(e.to_string()),
            }
        }
    }
}

fn readiness_response(
    service: &str,
    repository: DependencyStatus,
) -> (StatusCode, Json<ReadinessResponse>) {
    let ready = repository.healthy;
    let mut dependencies = HashMap::new();
    dependencies.insert("repository".to_string(), repository);

    let response = ReadinessResponse {
        ready,
        service: service.to_string(),
        dependencies,
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
