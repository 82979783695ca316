use serde::Deserialize;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AddParticipantRequest {
    pub name: String,
    pub credential: String,
    pub address: String,
    /// Parsed into a closed role set by the handler.
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct AddProductRequest {
    pub owner_id: u64,
    pub name: String,
    pub barcode: String,
    pub serial_number: String,
    pub quantity: u64,
}

#[derive(Debug, Deserialize)]
pub struct TransferOwnershipRequest {
    pub current_owner_id: u64,
    pub new_owner_id: u64,
}
