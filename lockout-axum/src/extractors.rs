use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use lockout_core::IdentityKey;

/// The normalized identity the login guard found in the request body.
///
/// `None` when the guard is not installed on the route or the body carried no
/// usable identity.
///
/// ```rust,ignore
/// async fn login(LoginIdentity(identity): LoginIdentity, Json(req): Json<LoginRequest>) {
///     tracing::info!(identity = ?identity, "login attempt");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LoginIdentity(pub Option<IdentityKey>);

impl<S> FromRequestParts<S> for LoginIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(LoginIdentity(parts.extensions.get::<IdentityKey>().cloned()))
    }
}

/// Pull the identifier out of a JSON login body.
///
/// Anything that is not a JSON object with a string at `field` yields `None`,
/// which the guard treats as "nothing to check".
pub(crate) fn identity_from_json(body: &[u8], field: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value.get(field)?.as_str().map(str::to_owned)
}
