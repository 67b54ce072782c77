//! Bearer Token Verification
//!
//! Session/token issuance belongs to the identity provider. This module only
//! verifies HS256-signed JWTs presented as `Authorization: Bearer <jwt>` and
//! extracts the subject. Roles are never read from the token.

use axum::http::{HeaderMap, header};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token verification configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC secret shared with the identity provider
    pub secret: Vec<u8>,
    /// Allowed clock skew when checking `exp`
    pub leeway_secs: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: Vec::new(),
            leeway_secs: 30,
        }
    }
}

impl TokenConfig {
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            secret,
            ..Default::default()
        }
    }

    /// Create config with a random secret (for development)
    pub fn with_random_secret() -> Self {
        Self::new(crate::crypto::random_bytes(32))
    }
}

/// JWT claims understood by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: Uuid,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Missing bearer token")]
    Missing,

    #[error("Invalid bearer token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// Verifies bearer tokens against the shared secret
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs;

        Self {
            key: DecodingKey::from_secret(&config.secret),
            validation,
        }
    }

    /// Verify a raw token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(data.claims)
    }

    /// Verify the bearer token carried by a request
    pub fn verify_headers(&self, headers: &HeaderMap) -> Result<Claims, TokenError> {
        let token = extract_bearer(headers).ok_or(TokenError::Missing)?;
        self.verify(token)
    }
}

/// Issue a token for `subject` (development tooling and tests)
pub fn issue_token(config: &TokenConfig, subject: Uuid, ttl: Duration) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = Claims {
        sub: subject,
        exp: (now + ttl).timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&config.secret),
    )?;

    Ok(token)
}

/// Extract the token from an `Authorization: Bearer` header
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}
