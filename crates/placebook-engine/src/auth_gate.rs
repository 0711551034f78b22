//! Authorization Gate
//!
//! Turns an `Authorization: Bearer <token>` value into the caller's user
//! id. Anything else fails `Unauthenticated`.

use placebook_core::credentials::TokenIssuer;
use placebook_core::errors::{PlaceError, Result};
use std::sync::Arc;

pub struct AuthGate {
    issuer: Arc<dyn TokenIssuer>,
}

impl AuthGate {
    pub fn new(issuer: Arc<dyn TokenIssuer>) -> Self {
        Self { issuer }
    }

    /// Resolve the caller's user id from an authorization header value
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<String> {
        let header = authorization.map(str::trim).unwrap_or_default();
        let token = match header.split_once(' ') {
            Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
            _ => "",
        };
        if token.is_empty() {
            return Err(PlaceError::Unauthenticated {
                reason: "missing bearer token".to_string(),
            }
            .into());
        }

        let claims = self.issuer.verify(token)?;
        tracing::debug!(user_id = %claims.sub, "Caller authenticated");
        Ok(claims.sub)
    }
}
