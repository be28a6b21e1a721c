//! HTTP middleware for HMS Core
//!
//! This module provides the per-route request pipeline and its parts:
//! - bearer-token extraction and identity resolution
//! - fixed-window rate limiting for the sensitive auth endpoints
//! - the pipeline composer ordering every gate in front of the handlers
//! - client IP injection for direct (proxyless) connections

pub mod auth;
pub mod client_ip;
pub mod pipeline;
pub mod rate_limit;

pub use auth::{AuthError, CurrentUser};
pub use client_ip::inject_client_ip;
pub use pipeline::{pipeline_middleware, PipelineState};
pub use rate_limit::FixedWindowLimiter;
