//! # vehicle-market
//!
//! REST API for a vehicle marketplace, built on axum.
//!
//! Two pure components sit at its core:
//!
//! - **Status resolution** ([`status::resolve_status`]): maps a domain
//!   [`ServiceResult`](responses::ServiceResult) to an HTTP status code, so
//!   controllers never choose failure codes themselves
//! - **Pagination presentation** ([`pagination`]): page metadata, the
//!   windowed page-link list with ellipses, and page-change validation
//!
//! Around them: a vehicle catalogue service, a repository seam with an
//! in-memory implementation, thin handlers, figment-based configuration,
//! JSON logging and a server with graceful shutdown.
//!
//! ## Example
//!
//! ```rust,no_run
//! use vehicle_market::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Load configuration
//!     let config = Config::load()?;
//!
//!     // Initialize tracing
//!     init_tracing(&config)?;
//!
//!     // Build application state and routes
//!     let state = AppState::new(config.clone());
//!     let app = router(state);
//!
//!     // Run server
//!     Server::new(config).serve(app).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod observability;
pub mod pagination;
pub mod repository;
pub mod responses;
pub mod routes;
pub mod server;
pub mod state;
pub mod status;
pub mod vehicles;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, CorsMode, MiddlewareConfig, PaginationConfig, ServiceConfig};
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::handlers::ListQuery;
    pub use crate::health::{health, readiness};
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{
        visible_page_numbers, PageChange, PageItem, PageNavigator, PaginationMetadata,
        PaginationView, DEFAULT_MAX_VISIBLE_PAGES,
    };
    pub use crate::repository::{
        InMemoryVehicleRepository, RepositoryError, RepositoryErrorKind, VehicleRepository,
    };
    pub use crate::responses::{ApiResponse, FieldErrors, ServiceResult};
    pub use crate::routes::router;
    pub use crate::server::Server;
    pub use crate::state::{AppState, AppStateBuilder};
    pub use crate::status::resolve_status;
    pub use crate::vehicles::{
        FuelType, NewVehicle, Vehicle, VehicleChanges, VehicleService, VehicleStatus,
    };

    pub use axum::{
        extract::{Path, Query, State},
        routing::{delete, get, post, put},
        Json, Router,
    };
    pub use serde::{Deserialize, Serialize};
    pub use tracing::{debug, error, info, warn};
}
