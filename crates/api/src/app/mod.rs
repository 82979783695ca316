//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use supplychain_auth::PolicyKind;
use supplychain_registry::{InMemoryRegistryService, RegistryService};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Shared handle to the registry, injected into every handler.
pub type SharedRegistry = Arc<InMemoryRegistryService>;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(policy: PolicyKind) -> Router {
    build_app_with(Arc::new(RegistryService::in_memory(policy)))
}

/// Build the router around an existing registry service.
pub fn build_app_with(registry: SharedRegistry) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(Extension(registry))
                .layer(axum::middleware::from_fn(middleware::caller_identity_middleware)),
        )
}
