//! Configuration management for HMS Core

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Database configuration
    pub database: DatabaseConfig,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Shared secret required by the registration endpoint (`x-admin-token`)
    pub admin_register_token: String,
    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub access_token_ttl_secs: i64,
}

/// Rate limit rule for a sensitive endpoint.
///
/// Counting is fixed-window: requests are counted in non-overlapping
/// windows of `window_secs`, and the counter resets at each boundary.
#[derive(Debug, Clone)]
pub struct RateLimitRule {
    /// Maximum requests allowed per window
    pub max_requests: u64,
    /// Window size in seconds
    pub window_secs: u64,
    /// Message returned to throttled clients
    pub message: String,
}

/// Rate limiting configuration for the two gated endpoints
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub login: RateLimitRule,
    pub register: RateLimitRule,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login: RateLimitRule {
                max_requests: 10,
                window_secs: 900,
                message: "Too many login attempts. Please try again after 15 minutes."
                    .to_string(),
            },
            register: RateLimitRule {
                max_requests: 5,
                window_secs: 900,
                message: "Too many registration attempts. Please try again after 15 minutes."
                    .to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// The signing secret and the admin registration token are required;
    /// startup fails without them rather than running with the gates open.
    pub fn from_env() -> Result<Self> {
        let defaults = RateLimitConfig::default();

        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()
                    .unwrap_or(2),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").context("JWT_SECRET is required")?,
                issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "hms-core".to_string()),
                access_token_ttl_secs: env::var("JWT_ACCESS_TOKEN_TTL_SECS")
                    .unwrap_or_else(|_| "3600".to_string())
                    .parse()
                    .unwrap_or(3600),
            },
            admin_register_token: env::var("ADMIN_REGISTER_TOKEN")
                .context("ADMIN_REGISTER_TOKEN is required")?,
            rate_limit: RateLimitConfig {
                login: RateLimitRule {
                    max_requests: env::var("RATE_LIMIT_LOGIN_MAX")
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(defaults.login.max_requests),
                    window_secs: env::var("RATE_LIMIT_LOGIN_WINDOW_SECS")
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(defaults.login.window_secs),
                    message: defaults.login.message,
                },
                register: RateLimitRule {
                    max_requests: env::var("RATE_LIMIT_REGISTER_MAX")
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(defaults.register.max_requests),
                    window_secs: env::var("RATE_LIMIT_REGISTER_WINDOW_SECS")
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(defaults.register.window_secs),
                    message: defaults.register.message,
                },
            },
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}
