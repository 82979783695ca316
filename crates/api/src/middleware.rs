use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use supplychain_auth::CallerIdentity;

use crate::context::CallerContext;

pub const CALLER_ADDRESS_HEADER: &str = "x-caller-address";
pub const CALLER_CREDENTIAL_HEADER: &str = "x-caller-credential";

/// Attach a [`CallerContext`] to every request.
///
/// Missing headers mean an anonymous caller; unreadable ones are a bad request.
pub async fn caller_identity_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let identity = extract_caller(req.headers())?;
    req.extensions_mut().insert(CallerContext::new(identity));
    Ok(next.run(req).await)
}

fn extract_caller(headers: &HeaderMap) -> Result<Option<CallerIdentity>, StatusCode> {
    let Some(address) = header_str(headers, CALLER_ADDRESS_HEADER)? else {
        return Ok(None);
    };

    let mut identity = CallerIdentity::new(address);
    if let Some(credential) = header_str(headers, CALLER_CREDENTIAL_HEADER)? {
        identity = identity.with_credential(credential);
    }
    Ok(Some(identity))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, StatusCode> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| StatusCode::BAD_REQUEST)?.trim();
    Ok((!value.is_empty()).then_some(value))
}
