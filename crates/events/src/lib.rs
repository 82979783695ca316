//! Registry events and their distribution.
//!
//! Events are facts recorded after a registry mutation commits. The bus fans
//! them out to whoever subscribed (audit trails, tests, read-side consumers).

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
