use serde::{Deserialize, Serialize};

/// Identity attached to a mutating call.
///
/// `address` is the external account the caller acts from (e.g. a blockchain
/// address). `credential` is only needed by policies that compare secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub address: String,
    #[serde(default)]
    pub credential: Option<String>,
}

impl CallerIdentity {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            credential: None,
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// Account comparison ignores ASCII case (checksummed vs lowercase hex).
    pub fn controls_address(&self, address: &str) -> bool {
        !address.is_empty() && self.address.eq_ignore_ascii_case(address)
    }
}
