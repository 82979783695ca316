//! Single-writer registry service.
//!
//! Every operation runs to completion under one lock, so ids are handed out
//! strictly in call order even with concurrent callers, and no reader ever
//! sees a half-applied command.

use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

use supplychain_auth::{AuthorizationPolicy, AuthzError, CallerIdentity, PolicyKind};
use supplychain_core::{Aggregate, AggregateRoot, DomainError, ParticipantId, ProductId, RegistryId};
use supplychain_events::{Event, EventBus, EventEnvelope, InMemoryEventBus, Subscription};
use supplychain_participants::ParticipantView;
use supplychain_products::ProductView;

use crate::registry::{
    AddParticipant, AddProduct, Registry, RegistryCommand, RegistryEvent, TransferOwnership,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error("registry lock poisoned")]
    Poisoned,
}

/// Service backed by the in-process bus.
pub type InMemoryRegistryService = RegistryService<InMemoryEventBus<EventEnvelope<RegistryEvent>>>;

#[derive(Debug)]
pub struct RegistryService<B> {
    registry: Mutex<Registry>,
    policy: Box<dyn AuthorizationPolicy>,
    bus: B,
}

impl InMemoryRegistryService {
    pub fn in_memory(policy: PolicyKind) -> Self {
        Self::new(Registry::default(), policy.build(), InMemoryEventBus::new())
    }
}

impl<B> RegistryService<B>
where
    B: EventBus<EventEnvelope<RegistryEvent>>,
{
    pub fn new(registry: Registry, policy: Box<dyn AuthorizationPolicy>, bus: B) -> Self {
        tracing::info!(
            registry_id = %registry.id(),
            policy = policy.name(),
            "registry service started"
        );
        Self {
            registry: Mutex::new(registry),
            policy,
            bus,
        }
    }

    pub fn registry_id(&self) -> Result<RegistryId, ServiceError> {
        Ok(*self.lock()?.id())
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Subscribe to envelopes committed from now on.
    pub fn subscribe(&self) -> Subscription<EventEnvelope<RegistryEvent>> {
        self.bus.subscribe()
    }

    pub fn add_participant(&self, command: AddParticipant) -> Result<ParticipantId, ServiceError> {
        let mut registry = self.lock()?;
        let id = registry.next_participant_id();
        self.commit(&mut registry, None, RegistryCommand::AddParticipant(command))?;
        Ok(id)
    }

    pub fn get_participant(&self, id: ParticipantId) -> Result<ParticipantView, ServiceError> {
        let view = self.lock()?.get_participant(id);
        tracing::debug!(participant_id = %id, found = !view.is_empty(), "participant lookup");
        Ok(view)
    }

    pub fn add_product(
        &self,
        caller: Option<&CallerIdentity>,
        command: AddProduct,
    ) -> Result<ProductId, ServiceError> {
        let mut registry = self.lock()?;
        let id = registry.next_product_id();
        self.commit(&mut registry, caller, RegistryCommand::AddProduct(command))?;
        Ok(id)
    }

    pub fn get_product(&self, id: ProductId) -> Result<ProductView, ServiceError> {
        let view = self.lock()?.get_product(id);
        tracing::debug!(product_id = %id, found = !view.is_empty(), "product lookup");
        Ok(view)
    }

    pub fn transfer_ownership(
        &self,
        caller: Option<&CallerIdentity>,
        command: TransferOwnership,
    ) -> Result<(), ServiceError> {
        let mut registry = self.lock()?;
        self.commit(&mut registry, caller, RegistryCommand::TransferOwnership(command))?;
        Ok(())
    }

    pub fn participant_count(&self) -> Result<usize, ServiceError> {
        Ok(self.lock()?.participant_count())
    }

    pub fn product_count(&self) -> Result<usize, ServiceError> {
        Ok(self.lock()?.product_count())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Registry>, ServiceError> {
        self.registry.lock().map_err(|_| ServiceError::Poisoned)
    }

    /// Decide, authorize, apply, publish. Nothing is applied unless the
    /// command passes both the registry rules and the caller policy.
    fn commit(
        &self,
        registry: &mut Registry,
        caller: Option<&CallerIdentity>,
        command: RegistryCommand,
    ) -> Result<Vec<RegistryEvent>, ServiceError> {
        let events = registry.handle(&command).inspect_err(|e| {
            tracing::warn!(error = %e, ?command, "registry command rejected");
        })?;

        if let Some(acting) = command.acting_participant() {
            self.authorize(registry, caller, acting)?;
        }

        for event in &events {
            registry.apply(event);
            let envelope = EventEnvelope::wrap(registry.version(), event.clone());
            tracing::info!(
                event_type = event.event_type(),
                sequence_number = envelope.sequence_number(),
                occurred_at = %event.occurred_at(),
                "registry event committed"
            );
            if let Err(e) = self.bus.publish(envelope) {
                tracing::warn!(error = ?e, "failed to publish registry event");
            }
        }

        Ok(events)
    }

    /// Fails closed: an acting participant missing from the registry is never
    /// waved through, whatever the policy.
    fn authorize(
        &self,
        registry: &Registry,
        caller: Option<&CallerIdentity>,
        acting: ParticipantId,
    ) -> Result<(), ServiceError> {
        let Some(participant) = registry.participant(acting) else {
            tracing::warn!(
                participant_id = %acting,
                policy = self.policy.name(),
                "acting participant not registered"
            );
            return Err(DomainError::not_found(format!("participant {acting}")).into());
        };

        self.policy
            .authorize(caller, &participant.claim())
            .inspect_err(|e| {
                tracing::warn!(
                    error = %e,
                    participant_id = %acting,
                    policy = self.policy.name(),
                    "caller not authorized"
                );
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use chrono::Utc;
    use supplychain_participants::Role;

    use super::*;
    use crate::registry::ONLY_MANUFACTURER;

    const ADDR_A: &str = "0x8B2Ada7b12E8bDac3a80Ed35458B46FcE652d582";
    const ADDR_B: &str = "0xd295d0BF5Fb583219CB7b8AB1a3F3f5E218D0442";
    const ADDR_C: &str = "0x9c4c246bca58D3b821bFFdbdB88D60E8E2727E84";

    fn participant(name: &str, credential: &str, address: &str, role: Role) -> AddParticipant {
        AddParticipant {
            name: name.to_string(),
            credential: credential.to_string(),
            address: address.to_string(),
            role,
            occurred_at: Utc::now(),
        }
    }

    fn product(owner: u64) -> AddProduct {
        AddProduct {
            owner_id: ParticipantId::new(owner),
            name: "ABC".to_string(),
            barcode: "100".to_string(),
            serial_number: "123".to_string(),
            quantity: 11,
            occurred_at: Utc::now(),
        }
    }

    fn transfer(from: u64, to: u64, product: u64) -> TransferOwnership {
        TransferOwnership {
            current_owner_id: ParticipantId::new(from),
            new_owner_id: ParticipantId::new(to),
            product_id: ProductId::new(product),
            occurred_at: Utc::now(),
        }
    }

    fn seeded(policy: PolicyKind) -> InMemoryRegistryService {
        let service = RegistryService::in_memory(policy);
        service.add_participant(participant("A", "passA", ADDR_A, Role::Manufacturer)).unwrap();
        service.add_participant(participant("B", "passB", ADDR_B, Role::Supplier)).unwrap();
        service.add_participant(participant("C", "passC", ADDR_C, Role::Consumer)).unwrap();
        service
    }

    #[test]
    fn supply_chain_scenario_under_trusting_policy() {
        let service = seeded(PolicyKind::Trust);

        let id = service.add_product(None, product(0)).unwrap();
        assert_eq!(id, ProductId::new(0));
        let view = service.get_product(id).unwrap();
        assert_eq!((view.name.as_str(), view.barcode.as_str(), view.serial_number.as_str()), ("ABC", "100", "123"));

        for owner in [1, 2] {
            match service.add_product(None, product(owner)) {
                Err(ServiceError::Domain(DomainError::AccessDenied(msg))) => {
                    assert!(msg.contains(ONLY_MANUFACTURER))
                }
                other => panic!("Expected AccessDenied, got {other:?}"),
            }
        }
        assert_eq!(service.product_count().unwrap(), 1);

        service.transfer_ownership(None, transfer(0, 1, 0)).unwrap();
        assert_eq!(service.get_product(id).unwrap().owner_id, Some(ParticipantId::new(1)));
    }

    #[test]
    fn account_policy_requires_the_owner_account() {
        let service = seeded(PolicyKind::Account);

        let stranger = CallerIdentity::new(ADDR_B);
        let err = service.add_product(Some(&stranger), product(0)).unwrap_err();
        assert_eq!(err, ServiceError::Authz(AuthzError::IdentityMismatch(ParticipantId::new(0))));
        assert_eq!(service.product_count().unwrap(), 0);

        let owner = CallerIdentity::new(ADDR_A);
        service.add_product(Some(&owner), product(0)).unwrap();

        assert_eq!(
            service.transfer_ownership(None, transfer(0, 1, 0)).unwrap_err(),
            ServiceError::Authz(AuthzError::Unauthenticated)
        );
        service.transfer_ownership(Some(&owner), transfer(0, 1, 0)).unwrap();
    }

    #[test]
    fn role_gate_is_reported_before_identity_checks() {
        let service = seeded(PolicyKind::Credential);
        let err = service.add_product(None, product(1)).unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::AccessDenied(_))));
    }

    #[test]
    fn credential_policy_compares_stored_secret() {
        let service = seeded(PolicyKind::Credential);
        let wrong = CallerIdentity::new(ADDR_A).with_credential("nope");
        assert!(service.add_product(Some(&wrong), product(0)).is_err());

        let right = CallerIdentity::new(ADDR_A).with_credential("passA");
        assert!(service.add_product(Some(&right), product(0)).is_ok());
    }

    #[test]
    fn committed_events_are_published_in_sequence() {
        let service = RegistryService::in_memory(PolicyKind::Trust);
        let sub = service.subscribe();

        service.add_participant(participant("A", "passA", ADDR_A, Role::Manufacturer)).unwrap();
        service.add_participant(participant("B", "passB", ADDR_B, Role::Supplier)).unwrap();
        service.add_product(None, product(0)).unwrap();
        let _ = service.add_product(None, product(1));
        service.transfer_ownership(None, transfer(0, 1, 0)).unwrap();

        let envelopes = sub.drain();
        let kinds: Vec<_> = envelopes.iter().map(|e| e.event_type().to_string()).collect();
        assert_eq!(
            kinds,
            vec![
                "registry.participant.added",
                "registry.participant.added",
                "registry.product.added",
                "registry.product.ownership_transferred",
            ]
        );
        let sequence: Vec<_> = envelopes.iter().map(|e| e.sequence_number()).collect();
        assert_eq!(sequence, vec![1, 2, 3, 4]);
    }

    #[test]
    fn envelopes_carry_the_committed_event() {
        let service = RegistryService::in_memory(PolicyKind::Trust);
        let sub = service.subscribe();

        service.add_participant(participant("A", "passA", ADDR_A, Role::Manufacturer)).unwrap();
        service.add_product(None, product(0)).unwrap();

        let envelopes = sub.drain();
        assert_eq!(envelopes.len(), 2);
        assert_ne!(envelopes[0].event_id(), envelopes[1].event_id());
        match envelopes[1].payload() {
            RegistryEvent::ProductAdded(e) => {
                assert_eq!(e.product_id, ProductId::new(0));
                assert_eq!(e.owner_id, ParticipantId::new(0));
                assert_eq!(e.quantity, 11);
            }
            other => panic!("Expected ProductAdded, got {other:?}"),
        }
    }

    #[test]
    fn transfer_of_product_with_unregistered_owner_is_refused() {
        use crate::registry::{ParticipantAdded, ProductAdded};

        // Product 0 claims owner 7, who was never added.
        let mut registry = Registry::default();
        registry.apply(&RegistryEvent::ParticipantAdded(ParticipantAdded {
            participant_id: ParticipantId::new(0),
            name: "A".to_string(),
            credential: "passA".to_string(),
            address: ADDR_A.to_string(),
            role: Role::Manufacturer,
            occurred_at: Utc::now(),
        }));
        registry.apply(&RegistryEvent::ProductAdded(ProductAdded {
            product_id: ProductId::new(0),
            owner_id: ParticipantId::new(7),
            name: "ABC".to_string(),
            barcode: "100".to_string(),
            serial_number: "123".to_string(),
            quantity: 11,
            occurred_at: Utc::now(),
        }));

        for policy in [PolicyKind::Trust, PolicyKind::Credential] {
            let service: InMemoryRegistryService =
                RegistryService::new(registry.clone(), policy.build(), InMemoryEventBus::new());
            let err = service.transfer_ownership(None, transfer(7, 0, 0)).unwrap_err();
            assert!(
                matches!(err, ServiceError::Domain(DomainError::NotFound(_))),
                "{policy}: got {err:?}"
            );
            assert_eq!(service.get_product(ProductId::new(0)).unwrap().owner_id, Some(ParticipantId::new(7)));
        }
    }

    #[test]
    fn soft_miss_reads_through_the_service() {
        let service = seeded(PolicyKind::Trust);
        assert!(service.get_participant(ParticipantId::new(3)).unwrap().is_empty());
        assert!(service.get_product(ProductId::new(0)).unwrap().is_empty());
    }

    #[test]
    fn concurrent_adds_receive_distinct_dense_ids() {
        let service = Arc::new(RegistryService::in_memory(PolicyKind::Trust));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    (0..25)
                        .map(|i| {
                            service
                                .add_participant(participant(&format!("{t}-{i}"), "pw", "0x0", Role::Supplier))
                                .unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .map(u64::from)
            .collect();
        ids.sort_unstable();

        assert_eq!(ids, (0..200).collect::<Vec<u64>>());
        assert_eq!(service.participant_count().unwrap(), 200);
    }
}
