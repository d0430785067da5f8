//! Admin session tokens.
//!
//! Tokens are HS256-signed JWTs keyed by the configured token secret. The subject
//! is the admin user's snowflake id rendered as a decimal string.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Claims carried by an admin session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin user id.
    pub sub: String,
    pub username: String,
    /// Admin group at the time of login (1 super admin, 2 normal admin).
    pub group: i16,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    /// Parses the subject back into the admin id.
    pub fn admin_id(&self) -> Result<i64, JwtError> {
        self.sub.parse().map_err(|_| JwtError::InvalidToken)
    }
}

/// A freshly signed token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    pub expires_at: i64,
}

/// Signing and validation settings for admin tokens.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    pub expiry_secs: i64,
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("expiry_secs", &self.expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Clock skew accepted when checking `exp`.
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

impl JwtConfig {
    /// Creates a config from the shared secret.
    pub fn new(secret: &str, expiry_secs: i64) -> Result<Self, JwtError> {
        Self::with_leeway(secret, expiry_secs, DEFAULT_LEEWAY_SECS)
    }

    pub fn with_leeway(secret: &str, expiry_secs: i64, leeway_secs: u64) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidKey("token secret must not be empty".into()));
        }
        if expiry_secs <= 0 {
            return Err(JwtError::InvalidKey("token lifetime must be positive".into()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_secs,
            leeway_secs,
        })
    }

    /// Signs a token for the given admin.
    pub fn issue(&self, admin_id: i64, username: &str, group: i16) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();
        let expires_at = (now + Duration::seconds(self.expiry_secs)).timestamp();

        let claims = Claims {
            sub: admin_id.to_string(),
            username: username.to_string(),
            group,
            exp: expires_at,
            iat: now.timestamp(),
            jti: jti.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok(IssuedToken {
            token,
            jti,
            expires_at,
        })
    }

    /// Validates signature and expiry, returning the claims.
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration as StdDuration;

    fn config() -> JwtConfig {
        JwtConfig::with_leeway("unit-test-token-secret", 3600, 0).unwrap()
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let config = config();
        let issued = config.issue(7_012_345_678_901, "root", 1).unwrap();

        let claims = config.validate(&issued.token).unwrap();
        assert_eq!(claims.admin_id().unwrap(), 7_012_345_678_901);
        assert_eq!(claims.username, "root");
        assert_eq!(claims.group, 1);
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(claims.exp, issued.expires_at);
    }

    #[test]
    fn test_lifetime_follows_config() {
        let config = config();
        let issued = config.issue(1, "a", 2).unwrap();
        let claims = config.validate(&issued.token).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = JwtConfig::with_leeway("another-secret", 3600, 0).unwrap();
        let issued = other.issue(1, "a", 2).unwrap();
        assert!(matches!(
            config().validate(&issued.token),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = JwtConfig::with_leeway("unit-test-token-secret", 1, 0).unwrap();
        let issued = config.issue(1, "a", 2).unwrap();

        sleep(StdDuration::from_secs(2));

        assert!(matches!(
            config.validate(&issued.token),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(config().validate("not_a_jwt").is_err());
        assert!(config().validate("").is_err());
    }

    #[test]
    fn test_empty_secret_is_refused() {
        assert!(matches!(
            JwtConfig::new("", 3600),
            Err(JwtError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_non_numeric_subject_is_invalid() {
        let claims = Claims {
            sub: "abc".into(),
            username: "x".into(),
            group: 2,
            exp: 0,
            iat: 0,
            jti: String::new(),
        };
        assert!(matches!(claims.admin_id(), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", config());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("unit-test-token-secret"));
    }
}
