use core::str::FromStr;

use serde::{Deserialize, Serialize};

use supplychain_auth::ParticipantClaim;
use supplychain_core::{DomainError, Entity, ParticipantId};

/// Supply-chain role of a participant.
///
/// The set is closed: anything else is rejected when a participant is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Manufacturer,
    Supplier,
    Consumer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Manufacturer, Role::Supplier, Role::Consumer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manufacturer => "Manufacturer",
            Role::Supplier => "Supplier",
            Role::Consumer => "Consumer",
        }
    }

    /// Only manufacturers may register new products.
    pub fn can_add_products(&self) -> bool {
        *self == Role::Manufacturer
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    /// Exact, case-sensitive match on the role name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "unknown role '{s}' (expected Manufacturer, Supplier or Consumer)"
                ))
            })
    }
}

/// A registered supply-chain actor. Immutable once added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    name: String,
    credential: String,
    address: String,
    role: Role,
}

impl Participant {
    pub fn new(
        id: ParticipantId,
        name: impl Into<String>,
        credential: impl Into<String>,
        address: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            credential: credential.into(),
            address: address.into(),
            role,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored verbatim; not hashed.
    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Identity facts an authorization policy compares a caller against.
    pub fn claim(&self) -> ParticipantClaim<'_> {
        ParticipantClaim {
            participant_id: self.id,
            address: &self.address,
            credential: &self.credential,
        }
    }
}

impl Entity for Participant {
    type Id = ParticipantId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Caller-facing projection of a participant.
///
/// Lookups never fail: an unknown id projects to the all-empty view, so callers
/// must check [`ParticipantView::is_empty`] to detect "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantView {
    pub name: String,
    pub credential: String,
    pub role: String,
}

impl ParticipantView {
    pub fn from_lookup(participant: Option<&Participant>) -> Self {
        participant.map(Self::from).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.credential.is_empty() && self.role.is_empty()
    }
}

impl From<&Participant> for ParticipantView {
    fn from(p: &Participant) -> Self {
        Self {
            name: p.name.clone(),
            credential: p.credential.clone(),
            role: p.role.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn manufacturer() -> Participant {
        Participant::new(
            ParticipantId::new(0),
            "A",
            "passA",
            "0x8B2Ada7b12E8bDac3a80Ed35458B46FcE652d582",
            Role::Manufacturer,
        )
    }

    #[test]
    fn role_names_round_trip_through_display_and_from_str() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_or_miscased_roles_are_rejected() {
        for raw in ["Retailer", "manufacturer", "", " Supplier"] {
            match raw.parse::<Role>() {
                Err(DomainError::Validation(msg)) => assert!(msg.contains("unknown role")),
                other => panic!("expected Validation for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn only_manufacturers_can_add_products() {
        assert!(Role::Manufacturer.can_add_products());
        assert!(!Role::Supplier.can_add_products());
        assert!(!Role::Consumer.can_add_products());
    }

    #[test]
    fn role_serializes_with_its_display_name() {
        assert_eq!(serde_json::to_string(&Role::Supplier).unwrap(), "\"Supplier\"");
    }

    #[test]
    fn view_projects_name_credential_and_role() {
        let view = ParticipantView::from(&manufacturer());
        assert_eq!(view.name, "A");
        assert_eq!(view.credential, "passA");
        assert_eq!(view.role, "Manufacturer");
        assert!(!view.is_empty());
    }

    #[test]
    fn missing_participant_projects_to_empty_view() {
        let view = ParticipantView::from_lookup(None);
        assert!(view.is_empty());
        assert_eq!(view, ParticipantView::default());
    }

    #[test]
    fn claim_exposes_stored_identity() {
        let p = manufacturer();
        let claim = p.claim();
        assert_eq!(claim.participant_id, p.id());
        assert_eq!(claim.credential, "passA");
        assert_eq!(claim.address, p.address());
    }

    proptest! {
        /// Property: any non-role string is rejected, whatever its content.
        #[test]
        fn arbitrary_strings_are_not_roles(raw in "[a-z]{0,12}") {
            prop_assert!(raw.parse::<Role>().is_err());
        }
    }
}
