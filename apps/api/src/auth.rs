//! JWT token service.
//!
//! Issues and validates the HS256 bearer tokens handed out at login.
//! Tokens are stateless: there is no revocation list and no refresh token.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use storefront_core::{Role, User};
use uuid::Uuid;

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id, as a decimal string
    pub sub: String,

    /// Email at issue time
    pub email: String,

    /// Role at issue time
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

impl Claims {
    /// The user id carried in `sub`.
    pub fn user_id(&self) -> Result<i64, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Malformed)
    }
}

/// Why a token was rejected.
///
/// Only these coarse categories ever reach a client; the underlying library
/// error is never echoed back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("expired")]
    Expired,

    #[error("bad signature")]
    BadSignature,

    #[error("malformed")]
    Malformed,

    /// Signing failed. Only possible with a broken key.
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            _ => TokenError::Malformed,
        }
    }
}

/// JWT token service.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service signing with `secret`.
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        TokenService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a token for `user`.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.ttl_secs);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Validate and decode a token.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        data.claims.user_id()?;
        Ok(data.claims)
    }
}

/// Extract bearer token from an authorization header value.
///
/// The scheme name is matched case-insensitively (`Bearer`, `bearer`, ...).
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let (scheme, token) = auth_header.trim_start().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty() && !token.contains(char::is_whitespace)).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: 7,
            email: "ann@example.com".to_string(),
            name: "Ann".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_roundtrip() {
        let service = TokenService::new("test-secret", 3600);

        let token = service.issue(&user(Role::Admin)).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.email, "ann@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_tokens_are_unique() {
        let service = TokenService::new("test-secret", 3600);
        let a = service.validate(&service.issue(&user(Role::User)).unwrap()).unwrap();
        let b = service.validate(&service.issue(&user(Role::User)).unwrap()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenService::new("secret-a", 3600);
        let verifier = TokenService::new("secret-b", 3600);

        let token = issuer.issue(&user(Role::User)).unwrap();
        assert_eq!(verifier.validate(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_garbage_rejected() {
        let service = TokenService::new("test-secret", 3600);
        assert_eq!(service.validate("not.a.token"), Err(TokenError::Malformed));
        assert_eq!(service.validate(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = TokenService::new("test-secret", -10);
        let token = service.issue(&user(Role::User)).unwrap();
        assert_eq!(service.validate(&token), Err(TokenError::Expired));
    }

    #[tokio::test]
    async fn test_token_expires_after_ttl() {
        let service = TokenService::new("test-secret", 1);
        let token = service.issue(&user(Role::User)).unwrap();
        assert!(service.validate(&token).is_ok());

        tokio::time::sleep(std::time::Duration::from_secs(2)).await;

        assert_eq!(service.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("BEARER   abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Bearer"), None);
        assert_eq!(extract_bearer_token("Bearer a b"), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearerabc"), None);
    }
}
