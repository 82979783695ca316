use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use supplychain_core::{ParticipantId, ProductId};
use supplychain_registry::{AddProduct, TransferOwnership};

use crate::app::{SharedRegistry, dto, errors};
use crate::context::CallerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(add_product))
        .route("/:id", get(get_product))
        .route("/:id/transfer", post(transfer_ownership))
}

pub async fn add_product(
    Extension(registry): Extension<SharedRegistry>,
    Extension(caller): Extension<CallerContext>,
    body: Result<Json<dto::AddProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let cmd = AddProduct {
        owner_id: ParticipantId::new(body.owner_id),
        name: body.name,
        barcode: body.barcode,
        serial_number: body.serial_number,
        quantity: body.quantity,
        occurred_at: Utc::now(),
    };

    match registry.add_product(caller.identity(), cmd) {
        Ok(id) => (StatusCode::CREATED, Json(serde_json::json!({ "id": id }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Never 404s: an unknown id answers with empty fields and a null owner.
pub async fn get_product(
    Extension(registry): Extension<SharedRegistry>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    match registry.get_product(id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn transfer_ownership(
    Extension(registry): Extension<SharedRegistry>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    body: Result<Json<dto::TransferOwnershipRequest>, JsonRejection>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let cmd = TransferOwnership {
        current_owner_id: ParticipantId::new(body.current_owner_id),
        new_owner_id: ParticipantId::new(body.new_owner_id),
        product_id,
        occurred_at: Utc::now(),
    };

    match registry.transfer_ownership(caller.identity(), cmd) {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
