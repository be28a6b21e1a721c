//! User domain model and auth endpoint inputs

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Role carried by every identity; determines the permitted action set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Staff,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Doctor, Role::Staff];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Staff => "staff",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "doctor" => Some(Role::Doctor),
            "staff" => Some(Role::Staff),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User entity.
///
/// Created only through registration; there is no delete path. The
/// password hash never leaves the process: it is skipped on
/// serialization.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: StringUuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            username: String::new(),
            password_hash: String::new(),
            role: Role::Staff,
            name: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Public view of a user, returned from the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: StringUuid,
    pub username: String,
    pub role: Role,
    pub name: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            name: user.name.clone(),
        }
    }
}

/// Input for the registration endpoint
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(
        length(min = 3, max = 30, message = "Username must be between 3 and 30 characters"),
        custom(function = "validate_alphanumeric")
    )]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(custom(function = "validate_role_name"))]
    pub role: String,
}

/// Input for the login endpoint
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

lazy_static::lazy_static! {
    static ref ALPHANUMERIC_REGEX: regex::Regex = regex::Regex::new(r"^[A-Za-z0-9]+$").unwrap();
}

fn validate_alphanumeric(username: &str) -> Result<(), ValidationError> {
    if ALPHANUMERIC_REGEX.is_match(username) {
        Ok(())
    } else {
        let mut err = ValidationError::new("alphanumeric");
        err.message = Some("Username must contain only letters and numbers".into());
        Err(err)
    }
}

fn validate_role_name(role: &str) -> Result<(), ValidationError> {
    if Role::parse(role).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("role");
        err.message = Some("Role must be one of: admin, doctor, staff".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_role_parse_roundtrip() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse("Admin"), None);
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Doctor).unwrap(), "\"doctor\"");
        let role: Role = serde_json::from_str("\"staff\"").unwrap();
        assert_eq!(role, Role::Staff);
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = User {
            username: "admin".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("admin"));
    }

    #[test]
    fn test_register_input_valid() {
        let input = RegisterInput {
            username: "drsmith42".to_string(),
            password: "password123".to_string(),
            name: "Dr. Smith".to_string(),
            role: "doctor".to_string(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_register_input_aggregates_all_violations() {
        let input = RegisterInput {
            username: "ab".to_string(),
            password: "x".to_string(),
            name: String::new(),
            role: "superuser".to_string(),
        };

        let err: AppError = input.validate().unwrap_err().into();
        match err {
            AppError::Validation(violations) => {
                assert_eq!(violations.len(), 4);
                let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
                assert!(fields.contains(&"username"));
                assert!(fields.contains(&"password"));
                assert!(fields.contains(&"name"));
                assert!(fields.contains(&"role"));
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_register_input_rejects_non_alphanumeric_username() {
        let input = RegisterInput {
            username: "dr_smith!".to_string(),
            password: "password123".to_string(),
            name: "Dr. Smith".to_string(),
            role: "doctor".to_string(),
        };
        let err = input.validate().unwrap_err();
        assert!(err.field_errors().contains_key("username"));
    }

    #[test]
    fn test_login_input_requires_both_fields() {
        let input = LoginInput {
            username: String::new(),
            password: String::new(),
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.field_errors().len(), 2);
    }

    #[test]
    fn test_user_profile_from_user() {
        let user = User {
            username: "admin".to_string(),
            role: Role::Admin,
            name: "System Admin".to_string(),
            ..Default::default()
        };
        let profile = UserProfile::from(&user);
        assert_eq!(profile.id, user.id);
        assert_eq!(profile.username, "admin");
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.name, "System Admin");
    }
}
