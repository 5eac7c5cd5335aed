//! Admin authentication trait.
//!
//! Write routes only know this trait. The concrete implementation is
//! injected at startup time, so the static shared secret can later be
//! swapped for a real credential check without touching the handlers.

use axum::http::HeaderMap;
use tracing::debug;

use crate::ServiceError;

/// Request header carrying the admin secret.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Body field carrying the admin secret when the header is absent.
const BODY_PASSWORD_FIELD: &str = "password";

/// Pluggable authenticator, consulted before any validation or store
/// access on admin routes.
///
/// - `headers`: the HTTP request headers
/// - `body`: the parsed JSON body, if the request had a valid one
/// - Returns `Ok(())` if allowed, `Err(ServiceError::Unauthorized)` if denied.
pub trait Authenticator: Send + Sync + 'static {
    fn check(
        &self,
        headers: &HeaderMap,
        body: Option<&serde_json::Value>,
    ) -> Result<(), ServiceError>;
}

/// Static shared-secret gate.
///
/// The secret is taken from the `x-admin-password` header, or from a string
/// `password` field of an object body. It must match exactly.
pub struct SharedSecret {
    password: String,
}

impl SharedSecret {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    fn supplied<'a>(
        headers: &'a HeaderMap,
        body: Option<&'a serde_json::Value>,
    ) -> Option<&'a str> {
        headers
            .get(ADMIN_PASSWORD_HEADER)
            .and_then(|v| v.to_str().ok())
            .or_else(|| {
                body.and_then(|b| b.get(BODY_PASSWORD_FIELD))
                    .and_then(|v| v.as_str())
            })
    }
}

impl Authenticator for SharedSecret {
    fn check(
        &self,
        headers: &HeaderMap,
        body: Option<&serde_json::Value>,
    ) -> Result<(), ServiceError> {
        match Self::supplied(headers, body) {
            Some(secret) if secret == self.password => Ok(()),
            Some(_) => {
                debug!("admin check failed: wrong secret");
                Err(ServiceError::Unauthorized("Unauthorized".into()))
            }
            None => {
                debug!("admin check failed: no secret supplied");
                Err(ServiceError::Unauthorized("Unauthorized".into()))
            }
        }
    }
}

/// A no-op authenticator that allows everything. Used for testing.
pub struct AllowAll;

impl Authenticator for AllowAll {
    fn check(
        &self,
        _headers: &HeaderMap,
        _body: Option<&serde_json::Value>,
    ) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// An authenticator that denies everything. Used for testing.
pub struct DenyAll;

impl Authenticator for DenyAll {
    fn check(
        &self,
        _headers: &HeaderMap,
        _body: Option<&serde_json::Value>,
    ) -> Result<(), ServiceError> {
        Err(ServiceError::Unauthorized("access denied".into()))
    }
}
