//! Bearer-token verification.
//!
//! Tokens are minted by the user service (HS256, shared secret); this
//! service only verifies the signature and extracts the user id claim.
//! Every order route requires a valid token.

use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------------

/// Public claims this service relies on: the user id plus expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's id as minted by the user service.
    pub id: String,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

// ---------------------------------------------------------------------------
// AuthError
// ---------------------------------------------------------------------------

/// Why a request could not be authenticated. Always surfaced as 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization: Bearer …` header present.
    MissingToken,
    /// Signature, expiry, or shape check failed.
    InvalidToken,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Authentication required"),
            AuthError::InvalidToken => write!(f, "Invalid or expired token"),
        }
    }
}

impl std::error::Error for AuthError {}

// ---------------------------------------------------------------------------
// TokenVerifier
// ---------------------------------------------------------------------------

/// Holds the decoding key; cheap to clone into the shared app state.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Extract and verify the bearer token, returning the caller's user id.
    pub fn require_user(&self, headers: &HeaderMap) -> Result<String, AuthError> {
        let header = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingToken)?;

        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(data.claims.id)
    }
}

/// Mint a token the verifier accepts. Dev/test helper only — production
/// tokens come from the user service's login endpoint.
pub fn mint_token(secret: &str, user_id: &str, ttl: Duration) -> String {
    let claims = Claims {
        id: user_id.to_string(),
        exp: (Utc::now() + ttl).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("HS256 signing cannot fail with a byte-slice secret")
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "unit-test-secret";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn minted_token_verifies_and_yields_user_id() {
        let verifier = TokenVerifier::new(SECRET);
        let token = mint_token(SECRET, "u42", Duration::hours(1));

        let user = verifier
            .require_user(&headers_with(&format!("Bearer {token}")))
            .unwrap();
        assert_eq!(user, "u42");
    }

    #[test]
    fn missing_header_is_missing_token() {
        let verifier = TokenVerifier::new(SECRET);
        assert_eq!(
            verifier.require_user(&HeaderMap::new()),
            Err(AuthError::MissingToken)
        );
    }

    #[test]
    fn non_bearer_scheme_is_missing_token() {
        let verifier = TokenVerifier::new(SECRET);
        assert_eq!(
            verifier.require_user(&headers_with("Basic dXNlcjpwdw==")),
            Err(AuthError::MissingToken)
        );
    }

    #[test]
    fn wrong_secret_is_invalid_token() {
        let verifier = TokenVerifier::new(SECRET);
        let token = mint_token("other-secret", "u42", Duration::hours(1));

        assert_eq!(
            verifier.require_user(&headers_with(&format!("Bearer {token}"))),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn expired_token_is_invalid() {
        let verifier = TokenVerifier::new(SECRET);
        let token = mint_token(SECRET, "u42", Duration::seconds(-3600));

        assert_eq!(
            verifier.require_user(&headers_with(&format!("Bearer {token}"))),
            Err(AuthError::InvalidToken)
        );
    }
}
