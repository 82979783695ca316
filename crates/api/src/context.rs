use supplychain_auth::CallerIdentity;

/// Caller identity for a request, as presented in headers.
///
/// Always present as a request extension; `identity()` is `None` for anonymous
/// calls. Whether anonymous calls may mutate is the registry policy's decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    identity: Option<CallerIdentity>,
}

impl CallerContext {
    pub fn new(identity: Option<CallerIdentity>) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> Option<&CallerIdentity> {
        self.identity.as_ref()
    }
}
