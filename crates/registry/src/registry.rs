use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use supplychain_core::{
    Aggregate, AggregateRoot, DomainError, DomainResult, ParticipantId, ProductId, RegistryId,
};
use supplychain_events::Event;
use supplychain_participants::{Participant, ParticipantView, Role};
use supplychain_products::{Product, ProductView};

/// Rejection message for product creation by anyone but a manufacturer.
pub const ONLY_MANUFACTURER: &str = "Only a Manufacturer can add products";

/// Aggregate root: the registry of participants and products.
///
/// Both collections are append-only and indexed by id: record `n` lives at
/// position `n`. Nothing outside `apply` mutates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    id: RegistryId,
    participants: Vec<Participant>,
    products: Vec<Product>,
    version: u64,
}

impl Registry {
    pub fn new(id: RegistryId) -> Self {
        Self {
            id,
            participants: Vec::new(),
            products: Vec::new(),
            version: 0,
        }
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn next_participant_id(&self) -> ParticipantId {
        ParticipantId::from_index(self.participants.len())
    }

    pub fn next_product_id(&self) -> ProductId {
        ProductId::from_index(self.products.len())
    }

    /// Direct lookup; `None` for an id that was never assigned.
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(id.index()?)
    }

    /// Direct lookup; `None` for an id that was never assigned.
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(id.index()?)
    }

    /// Soft-miss read: an unknown id yields the empty view, never an error.
    pub fn get_participant(&self, id: ParticipantId) -> ParticipantView {
        ParticipantView::from_lookup(self.participant(id))
    }

    /// Soft-miss read: an unknown id yields the default view, never an error.
    pub fn get_product(&self, id: ProductId) -> ProductView {
        ProductView::from_lookup(self.product(id))
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn add_participant(
        &mut self,
        name: impl Into<String>,
        credential: impl Into<String>,
        address: impl Into<String>,
        role: Role,
    ) -> DomainResult<ParticipantId> {
        let id = self.next_participant_id();
        self.execute(&RegistryCommand::AddParticipant(AddParticipant {
            name: name.into(),
            credential: credential.into(),
            address: address.into(),
            role,
            occurred_at: Utc::now(),
        }))?;
        Ok(id)
    }

    pub fn add_product(
        &mut self,
        owner_id: ParticipantId,
        name: impl Into<String>,
        barcode: impl Into<String>,
        serial_number: impl Into<String>,
        quantity: u64,
    ) -> DomainResult<ProductId> {
        let id = self.next_product_id();
        self.execute(&RegistryCommand::AddProduct(AddProduct {
            owner_id,
            name: name.into(),
            barcode: barcode.into(),
            serial_number: serial_number.into(),
            quantity,
            occurred_at: Utc::now(),
        }))?;
        Ok(id)
    }

    pub fn transfer_ownership(
        &mut self,
        current_owner_id: ParticipantId,
        new_owner_id: ParticipantId,
        product_id: ProductId,
    ) -> DomainResult<()> {
        self.execute(&RegistryCommand::TransferOwnership(TransferOwnership {
            current_owner_id,
            new_owner_id,
            product_id,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryId::new())
    }
}

impl AggregateRoot for Registry {
    type Id = RegistryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddParticipant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddParticipant {
    pub name: String,
    pub credential: String,
    pub address: String,
    pub role: Role,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddProduct {
    pub owner_id: ParticipantId,
    pub name: String,
    pub barcode: String,
    pub serial_number: String,
    pub quantity: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: TransferOwnership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOwnership {
    pub current_owner_id: ParticipantId,
    pub new_owner_id: ParticipantId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryCommand {
    AddParticipant(AddParticipant),
    AddProduct(AddProduct),
    TransferOwnership(TransferOwnership),
}

impl RegistryCommand {
    /// Participant the caller claims to act as, for commands that need one.
    pub fn acting_participant(&self) -> Option<ParticipantId> {
        match self {
            RegistryCommand::AddParticipant(_) => None,
            RegistryCommand::AddProduct(cmd) => Some(cmd.owner_id),
            RegistryCommand::TransferOwnership(cmd) => Some(cmd.current_owner_id),
        }
    }
}

/// Event: ParticipantAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantAdded {
    pub participant_id: ParticipantId,
    pub name: String,
    pub credential: String,
    pub address: String,
    pub role: Role,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAdded {
    pub product_id: ProductId,
    pub owner_id: ParticipantId,
    pub name: String,
    pub barcode: String,
    pub serial_number: String,
    pub quantity: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OwnershipTransferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTransferred {
    pub product_id: ProductId,
    pub previous_owner_id: ParticipantId,
    pub new_owner_id: ParticipantId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    ParticipantAdded(ParticipantAdded),
    ProductAdded(ProductAdded),
    OwnershipTransferred(OwnershipTransferred),
}

impl Event for RegistryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RegistryEvent::ParticipantAdded(_) => "registry.participant.added",
            RegistryEvent::ProductAdded(_) => "registry.product.added",
            RegistryEvent::OwnershipTransferred(_) => "registry.product.ownership_transferred",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RegistryEvent::ParticipantAdded(e) => e.occurred_at,
            RegistryEvent::ProductAdded(e) => e.occurred_at,
            RegistryEvent::OwnershipTransferred(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Registry {
    type Command = RegistryCommand;
    type Event = RegistryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            RegistryEvent::ParticipantAdded(e) => {
                debug_assert_eq!(e.participant_id, self.next_participant_id());
                self.participants.push(Participant::new(
                    e.participant_id,
                    e.name.clone(),
                    e.credential.clone(),
                    e.address.clone(),
                    e.role,
                ));
            }
            RegistryEvent::ProductAdded(e) => {
                debug_assert_eq!(e.product_id, self.next_product_id());
                self.products.push(Product::new(
                    e.product_id,
                    e.owner_id,
                    e.name.clone(),
                    e.barcode.clone(),
                    e.serial_number.clone(),
                    e.quantity,
                ));
            }
            RegistryEvent::OwnershipTransferred(e) => {
                if let Some(product) = e.product_id.index().and_then(|i| self.products.get_mut(i)) {
                    product.transfer_to(e.new_owner_id);
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            RegistryCommand::AddParticipant(cmd) => Ok(self.handle_add_participant(cmd)),
            RegistryCommand::AddProduct(cmd) => self.handle_add_product(cmd),
            RegistryCommand::TransferOwnership(cmd) => self.handle_transfer(cmd),
        }
    }
}

impl Registry {
    fn handle_add_participant(&self, cmd: &AddParticipant) -> Vec<RegistryEvent> {
        vec![RegistryEvent::ParticipantAdded(ParticipantAdded {
            participant_id: self.next_participant_id(),
            name: cmd.name.clone(),
            credential: cmd.credential.clone(),
            address: cmd.address.clone(),
            role: cmd.role,
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_add_product(&self, cmd: &AddProduct) -> DomainResult<Vec<RegistryEvent>> {
        // An unknown owner is just another non-manufacturer.
        let is_manufacturer = self
            .participant(cmd.owner_id)
            .is_some_and(|owner| owner.role().can_add_products());
        if !is_manufacturer {
            return Err(DomainError::access_denied(ONLY_MANUFACTURER));
        }

        Ok(vec![RegistryEvent::ProductAdded(ProductAdded {
            product_id: self.next_product_id(),
            owner_id: cmd.owner_id,
            name: cmd.name.clone(),
            barcode: cmd.barcode.clone(),
            serial_number: cmd.serial_number.clone(),
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_transfer(&self, cmd: &TransferOwnership) -> DomainResult<Vec<RegistryEvent>> {
        let product = self
            .product(cmd.product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {}", cmd.product_id)))?;

        if self.participant(cmd.new_owner_id).is_none() {
            return Err(DomainError::not_found(format!(
                "participant {}",
                cmd.new_owner_id
            )));
        }

        if !product.is_owned_by(cmd.current_owner_id) {
            return Err(DomainError::invalid_owner(format!(
                "participant {} does not own product {}",
                cmd.current_owner_id, cmd.product_id
            )));
        }

        Ok(vec![RegistryEvent::OwnershipTransferred(OwnershipTransferred {
            product_id: cmd.product_id,
            previous_owner_id: product.owner_id(),
            new_owner_id: cmd.new_owner_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
