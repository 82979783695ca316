use axum::{Router, routing::get};

pub mod participants;
pub mod products;
pub mod system;

/// Router for all registry endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/registry", get(system::registry_info))
        .nest("/participants", participants::router())
        .nest("/products", products::router())
}
