//! JWT token handling

use crate::config::JwtConfig;
use crate::domain::{Role, User};
use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Session token claims.
///
/// The token is stateless: possession of a correctly signed, unexpired
/// token is the whole proof of identity. There is no server-side session
/// record and no revocation list; a leaked token stays valid until `exp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Role carried by the authenticated subject
    pub role: Role,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Token verification failures.
///
/// `Expired` is distinct from `Invalid` so the client can tell a stale
/// session from a forged or malformed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The embedded expiry has passed
    Expired,
    /// Bad signature or malformed payload
    Invalid,
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Create a Validation with a strict leeway (5 seconds) instead of the
    /// default 60 seconds, so tokens expire promptly while still tolerating
    /// minor clock skew.
    fn strict_validation(&self) -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        v.leeway = 5;
        v.validate_aud = false;
        v.set_issuer(&[&self.config.issuer]);
        v
    }

    /// Create a session token for an authenticated user
    pub fn create_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.access_token_ttl_secs);

        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let header = Header::new(Algorithm::HS256);
        encode(&header, &claims, &self.encoding_key).map_err(|e| AppError::Internal(e.into()))
    }

    /// Verify a session token.
    ///
    /// Pure function of (token, current time, secret): no store lookups,
    /// no side effects.
    pub fn verify_token(&self, token: &str) -> std::result::Result<Claims, TokenError> {
        let validation = self.strict_validation();
        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::Invalid),
            },
        }
    }

    /// Get token expiration TTL in seconds
    pub fn access_token_ttl(&self) -> i64 {
        self.config.access_token_ttl_secs
    }
}
