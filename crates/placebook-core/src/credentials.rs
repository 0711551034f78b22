//! Password hashing and bearer tokens
//!
//! Both are seams: the engine only sees `PasswordHasher` and `TokenIssuer`.
//! The defaults are Argon2id for passwords and an HMAC-SHA256 signed token
//! carrying `{sub, email, exp}`.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use placebook_core_types::Sensitive;
use ring::hmac;
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};

use crate::errors::{ExError, PlaceError, Result};
use crate::model::User;

/// One-way password hashing
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &Sensitive<String>) -> Result<String>;

    /// `Ok(false)` on mismatch; `Err` only if `hash` cannot be parsed
    fn verify(&self, password: &Sensitive<String>, hash: &str) -> Result<bool>;
}

/// Argon2id hasher with explicit cost parameters
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Build a hasher with `memory_kib` KiB of memory and `iterations` passes
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self> {
        let params = Params::new(memory_kib, iterations, 1, None).map_err(|e| {
            ExError::operation_failed("argon2_params", format!("invalid argon2 params: {}", e))
        })?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &Sensitive<String>) -> Result<String> {
        let mut salt = [0u8; 16];
        SystemRandom::new()
            .fill(&mut salt)
            .map_err(|_| ExError::operation_failed("hash_password", "system RNG unavailable"))?;
        let salt = SaltString::encode_b64(&salt)
            .map_err(|e| ExError::operation_failed("hash_password", e.to_string()))?;

        let hash = self
            .argon2()
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|e| ExError::operation_failed("hash_password", e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &Sensitive<String>, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| ExError::operation_failed("verify_password", e.to_string()))?;
        Ok(self
            .argon2()
            .verify_password(password.expose().as_bytes(), &parsed)
            .is_ok())
    }
}

/// Claims carried by a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id
    pub sub: String,
    pub email: String,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

/// Issues and verifies opaque bearer tokens
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user: &User) -> Result<Sensitive<String>>;

    /// Fails `Unauthenticated` for malformed, forged or expired tokens
    fn verify(&self, token: &str) -> Result<TokenClaims>;
}

/// `base64url(claims).base64url(hmac_sha256(claims))`
pub struct HmacTokenIssuer {
    key: hmac::Key,
    ttl_secs: i64,
}

impl HmacTokenIssuer {
    pub fn new(secret: &Sensitive<String>, ttl_secs: i64) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret.expose().as_bytes()),
            ttl_secs,
        }
    }

    fn sign_claims(&self, claims: &TokenClaims) -> Result<String> {
        let json = serde_json::to_vec(claims)
            .map_err(|e| ExError::operation_failed("issue_token", e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let tag = hmac::sign(&self.key, payload.as_bytes());
        Ok(format!("{}.{}", payload, URL_SAFE_NO_PAD.encode(tag.as_ref())))
    }
}

fn rejected(reason: &str) -> ExError {
    PlaceError::Unauthenticated {
        reason: reason.to_string(),
    }
    .into()
}

impl TokenIssuer for HmacTokenIssuer {
    fn issue(&self, user: &User) -> Result<Sensitive<String>> {
        let claims = TokenClaims {
            sub: user.id.clone(),
            email: user.email.clone(),
            exp: Utc::now().timestamp() + self.ttl_secs,
        };
        self.sign_claims(&claims).map(Sensitive::new)
    }

    fn verify(&self, token: &str) -> Result<TokenClaims> {
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| rejected("malformed token"))?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| rejected("malformed token"))?;
        hmac::verify(&self.key, payload.as_bytes(), &signature)
            .map_err(|_| rejected("invalid token signature"))?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| rejected("malformed token"))?;
        let claims: TokenClaims =
            serde_json::from_slice(&json).map_err(|_| rejected("malformed token"))?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(rejected("token expired"));
        }
        Ok(claims)
    }
}
