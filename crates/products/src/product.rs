use serde::{Deserialize, Serialize};

use supplychain_core::{Entity, ParticipantId, ProductId};

/// A tracked item. Everything except the owner is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    barcode: String,
    serial_number: String,
    quantity: u64,
    owner_id: ParticipantId,
}

impl Product {
    pub fn new(
        id: ProductId,
        owner_id: ParticipantId,
        name: impl Into<String>,
        barcode: impl Into<String>,
        serial_number: impl Into<String>,
        quantity: u64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            barcode: barcode.into(),
            serial_number: serial_number.into(),
            quantity,
            owner_id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn owner_id(&self) -> ParticipantId {
        self.owner_id
    }

    pub fn is_owned_by(&self, participant_id: ParticipantId) -> bool {
        self.owner_id == participant_id
    }

    /// Move the product to `new_owner`.
    ///
    /// Existence of `new_owner` is checked by the registry before this is called.
    pub fn transfer_to(&mut self, new_owner: ParticipantId) {
        self.owner_id = new_owner;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Caller-facing projection of a product.
///
/// An unknown id projects to the default view (empty text, zero quantity, no
/// owner). Callers must treat [`ProductView::is_empty`] as "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductView {
    pub name: String,
    pub barcode: String,
    pub serial_number: String,
    pub quantity: u64,
    pub owner_id: Option<ParticipantId>,
}

impl ProductView {
    pub fn from_lookup(product: Option<&Product>) -> Self {
        product.map(Self::from).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.owner_id.is_none()
    }
}

impl From<&Product> for ProductView {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            barcode: p.barcode.clone(),
            serial_number: p.serial_number.clone(),
            quantity: p.quantity,
            owner_id: Some(p.owner_id),
        }
    }
}
