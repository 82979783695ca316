//! Supply-chain registry: participants, role-gated product creation and
//! ownership transfer.
//!
//! - `registry`: the aggregate (pure decision logic + state evolution)
//! - `service`: single-writer wrapper adding authorization and event publishing

pub mod registry;
pub mod service;

pub use registry::{
    AddParticipant, AddProduct, OwnershipTransferred, ParticipantAdded, ProductAdded, Registry,
    RegistryCommand, RegistryEvent, TransferOwnership, ONLY_MANUFACTURER,
};
pub use service::{InMemoryRegistryService, RegistryService, ServiceError};
