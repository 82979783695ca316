use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::{SharedRegistry, errors};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Registry identity, active policy and collection sizes.
pub async fn registry_info(Extension(registry): Extension<SharedRegistry>) -> axum::response::Response {
    let info = registry.registry_id().and_then(|id| {
        Ok((
            id,
            registry.participant_count()?,
            registry.product_count()?,
        ))
    });

    match info {
        Ok((id, participants, products)) => Json(serde_json::json!({
            "registry_id": id.to_string(),
            "policy": registry.policy_name(),
            "participants": participants,
            "products": products,
        }))
        .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
