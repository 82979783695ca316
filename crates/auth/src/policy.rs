//! Built-in authorization policies.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AuthorizationPolicy, AuthzError, CallerIdentity, ParticipantClaim};

/// Accepts every call: the acting participant id is taken at face value.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrustCaller;

impl AuthorizationPolicy for TrustCaller {
    fn name(&self) -> &'static str {
        "trust"
    }

    fn authorize(
        &self,
        _caller: Option<&CallerIdentity>,
        _claim: &ParticipantClaim<'_>,
    ) -> Result<(), AuthzError> {
        Ok(())
    }
}

/// Requires the caller to act from the participant's registered account.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccountBound;

impl AuthorizationPolicy for AccountBound {
    fn name(&self) -> &'static str {
        "account"
    }

    fn authorize(
        &self,
        caller: Option<&CallerIdentity>,
        claim: &ParticipantClaim<'_>,
    ) -> Result<(), AuthzError> {
        let caller = caller.ok_or(AuthzError::Unauthenticated)?;
        if !caller.controls_address(claim.address) {
            return Err(AuthzError::IdentityMismatch(claim.participant_id));
        }
        Ok(())
    }
}

/// Account match plus the participant's stored credential.
#[derive(Debug, Default, Clone, Copy)]
pub struct CredentialBound;

impl AuthorizationPolicy for CredentialBound {
    fn name(&self) -> &'static str {
        "credential"
    }

    fn authorize(
        &self,
        caller: Option<&CallerIdentity>,
        claim: &ParticipantClaim<'_>,
    ) -> Result<(), AuthzError> {
        AccountBound.authorize(caller, claim)?;

        // AccountBound already rejected the anonymous case.
        let presented = caller.and_then(CallerIdentity::credential);
        if presented != Some(claim.credential) {
            return Err(AuthzError::CredentialMismatch(claim.participant_id));
        }
        Ok(())
    }
}

/// Policy selector as it appears in configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Trust,
    Account,
    Credential,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Trust => "trust",
            PolicyKind::Account => "account",
            PolicyKind::Credential => "credential",
        }
    }

    pub fn build(self) -> Box<dyn AuthorizationPolicy> {
        match self {
            PolicyKind::Trust => Box::new(TrustCaller),
            PolicyKind::Account => Box::new(AccountBound),
            PolicyKind::Credential => Box::new(CredentialBound),
        }
    }
}

impl core::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trust" => Ok(PolicyKind::Trust),
            "account" => Ok(PolicyKind::Account),
            "credential" => Ok(PolicyKind::Credential),
            other => Err(format!(
                "unknown authorization policy '{other}' (expected trust, account or credential)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplychain_core::ParticipantId;

    const ADDR: &str = "0x8B2Ada7b12E8bDac3a80Ed35458B46FcE652d582";

    fn claim() -> ParticipantClaim<'static> {
        ParticipantClaim {
            participant_id: ParticipantId::new(0),
            address: ADDR,
            credential: "passA",
        }
    }

    #[test]
    fn trust_caller_accepts_anonymous_calls() {
        assert_eq!(TrustCaller.authorize(None, &claim()), Ok(()));
    }

    #[test]
    fn account_bound_requires_a_caller() {
        assert_eq!(
            AccountBound.authorize(None, &claim()),
            Err(AuthzError::Unauthenticated)
        );
    }

    #[test]
    fn account_bound_matches_address_ignoring_case() {
        let caller = CallerIdentity::new(ADDR.to_ascii_lowercase());
        assert_eq!(AccountBound.authorize(Some(&caller), &claim()), Ok(()));

        let other = CallerIdentity::new("0xd295d0BF5Fb583219CB7b8AB1a3F3f5E218D0442");
        assert_eq!(
            AccountBound.authorize(Some(&other), &claim()),
            Err(AuthzError::IdentityMismatch(ParticipantId::new(0)))
        );
    }

    #[test]
    fn empty_registered_address_never_matches() {
        let caller = CallerIdentity::new("");
        let claim = ParticipantClaim {
            address: "",
            ..claim()
        };
        assert!(AccountBound.authorize(Some(&caller), &claim).is_err());
    }

    #[test]
    fn credential_bound_checks_the_stored_secret() {
        let good = CallerIdentity::new(ADDR).with_credential("passA");
        assert_eq!(CredentialBound.authorize(Some(&good), &claim()), Ok(()));

        let wrong = CallerIdentity::new(ADDR).with_credential("passB");
        assert_eq!(
            CredentialBound.authorize(Some(&wrong), &claim()),
            Err(AuthzError::CredentialMismatch(ParticipantId::new(0)))
        );

        let missing = CallerIdentity::new(ADDR);
        assert!(CredentialBound.authorize(Some(&missing), &claim()).is_err());
    }

    #[test]
    fn policy_kind_parses_config_values() {
        assert_eq!("Account".parse::<PolicyKind>(), Ok(PolicyKind::Account));
        assert_eq!(" credential ".parse::<PolicyKind>(), Ok(PolicyKind::Credential));
        assert!("root".parse::<PolicyKind>().is_err());
        assert_eq!(PolicyKind::default().build().name(), "trust");
    }

    #[test]
    fn caller_identity_deserializes_without_credential() {
        let caller: CallerIdentity = serde_json::from_str(&format!(r#"{{"address":"{ADDR}"}}"#)).unwrap();
        assert_eq!(caller.credential(), None);
    }
}
