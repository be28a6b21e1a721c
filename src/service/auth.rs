//! Registration and login business logic

use crate::domain::{LoginInput, RegisterInput, Role, StringUuid, User};
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::repository::UserRepository;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

pub struct AuthService<U: UserRepository> {
    user_repo: Arc<U>,
    jwt_manager: JwtManager,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: Arc<U>, jwt_manager: JwtManager) -> Self {
        Self {
            user_repo,
            jwt_manager,
        }
    }

    /// Register a new user. Duplicate usernames are a conflict.
    pub async fn register(&self, input: RegisterInput) -> Result<User> {
        input.validate()?;

        let role = Role::parse(&input.role).ok_or_else(|| {
            AppError::validation("role", "Role must be one of: admin, doctor, staff")
        })?;

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let now = Utc::now();
        let user = User {
            id: StringUuid::new_v4(),
            username: input.username,
            password_hash,
            role,
            name: input.name,
            created_at: now,
            updated_at: now,
        };

        self.user_repo.create(&user).await
    }

    /// Authenticate a user and issue a session token.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the
    /// caller; neither reveals whether the account exists.
    pub async fn login(&self, input: LoginInput) -> Result<(String, User)> {
        input.validate()?;

        let user = self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("Invalid credentials".to_string()))?;

        if !verify_password(&input.password, &user.password_hash) {
            return Err(AppError::Unauthenticated("Invalid credentials".to_string()));
        }

        let token = self.jwt_manager.create_token(&user)?;
        Ok((token, user))
    }
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored hash.
///
/// Any failure (malformed hash included) is "no match"; nothing more is
/// surfaced to the caller.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
