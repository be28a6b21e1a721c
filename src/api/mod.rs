//! REST API handlers and shared response types

pub mod appointment;
pub mod auth;
pub mod health;
pub mod invoice;
pub mod metrics;
pub mod patient;

use serde::{Deserialize, Serialize};

/// Plain `{ "message": ... }` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
