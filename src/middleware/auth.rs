//! Bearer-token extraction and identity resolution

use crate::domain::{Role, StringUuid};
use crate::error::AppError;
use crate::jwt::{Claims, TokenError};
use axum::http::{header::AUTHORIZATION, HeaderMap};

/// Identity resolved from a verified session token
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User ID from the token's `sub` claim
    pub id: StringUuid,
    /// Role carried by the token
    pub role: Role,
}

impl CurrentUser {
    pub fn from_claims(claims: Claims) -> Result<Self, AuthError> {
        let id = StringUuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(Self {
            id,
            role: claims.role,
        })
    }
}

/// Authentication failures, one variant per distinguishable cause.
///
/// All map to 401; the message tells the client whether to re-login
/// (expired) or treat the token as garbage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No Authorization header present
    MissingToken,
    /// Header present but not a well-formed Bearer value
    InvalidHeader,
    /// Signature check failed or payload malformed
    InvalidToken,
    /// Token was valid once, but its expiry has passed
    TokenExpired,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Missing authorization token",
            AuthError::InvalidHeader => "Invalid authorization header",
            AuthError::InvalidToken => "Invalid token",
            AuthError::TokenExpired => "Token has expired",
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Invalid => AuthError::InvalidToken,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Unauthenticated(err.message().to_string())
    }
}

/// Extract and validate the Bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidHeader)
}
