use thiserror::Error;

use supplychain_core::ParticipantId;

use crate::CallerIdentity;

/// What the registry has on file for the participant a call claims to act as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipantClaim<'a> {
    pub participant_id: ParticipantId,
    pub address: &'a str,
    pub credential: &'a str,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("caller identity required")]
    Unauthenticated,

    #[error("caller does not control the account of participant {0}")]
    IdentityMismatch(ParticipantId),

    #[error("credential mismatch for participant {0}")]
    CredentialMismatch(ParticipantId),
}

/// Check inserted between request receipt and mutation.
///
/// - No IO
/// - No panics
/// - No business logic (role rules stay in the registry)
pub trait AuthorizationPolicy: Send + Sync + core::fmt::Debug {
    /// Short name used in logs and config.
    fn name(&self) -> &'static str;

    /// Decide whether `caller` may act as the participant described by `claim`.
    fn authorize(
        &self,
        caller: Option<&CallerIdentity>,
        claim: &ParticipantClaim<'_>,
    ) -> Result<(), AuthzError>;
}
