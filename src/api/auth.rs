//! Auth API handlers

use crate::api::MessageResponse;
use crate::domain::{LoginInput, RegisterInput, UserProfile};
use crate::error::Result;
use crate::state::HasServices;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

/// Login response: the session token plus the public user profile
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Register a new user.
///
/// The admin-token gate and the field validation have already run in the
/// request pipeline by the time this executes.
pub async fn register<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<RegisterInput>,
) -> Result<impl IntoResponse> {
    let user = state.auth_service().register(input).await?;
    tracing::info!(username = %user.username, role = %user.role, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// Log in with username and password
pub async fn login<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse> {
    let (token, user) = state.auth_service().login(input).await?;
    Ok(Json(LoginResponse {
        token,
        user: UserProfile::from(&user),
    }))
}
