//! `supplychain-auth` — caller identity and pluggable authorization policies.
//!
//! This crate is intentionally decoupled from HTTP and storage: a policy only
//! compares what the caller presented against what the registry has on file.

pub mod authorize;
pub mod caller;
pub mod policy;

pub use authorize::{AuthorizationPolicy, AuthzError, ParticipantClaim};
pub use caller::CallerIdentity;
pub use policy::{AccountBound, CredentialBound, PolicyKind, TrustCaller};
