use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use supplychain_core::ParticipantId;
use supplychain_participants::Role;
use supplychain_registry::AddParticipant;

use crate::app::{SharedRegistry, dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(add_participant))
        .route("/:id", get(get_participant))
}

pub async fn add_participant(
    Extension(registry): Extension<SharedRegistry>,
    body: Result<Json<dto::AddParticipantRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let role: Role = match body.role.parse() {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let cmd = AddParticipant {
        name: body.name,
        credential: body.credential,
        address: body.address,
        role,
        occurred_at: Utc::now(),
    };

    match registry.add_participant(cmd) {
        Ok(id) => (StatusCode::CREATED, Json(serde_json::json!({ "id": id }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Never 404s: an unknown id answers with empty fields.
pub async fn get_participant(
    Extension(registry): Extension<SharedRegistry>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ParticipantId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid participant id"),
    };

    match registry.get_participant(id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
