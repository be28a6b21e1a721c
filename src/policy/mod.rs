//! Centralized authorization policy for HTTP routes.
//!
//! The role-permission matrix lives here and nowhere else: a route is
//! authorized iff the authenticated role appears in the permitted set for
//! its (resource, verb) pair.

use crate::domain::Role;
use crate::error::AppError;

/// Protected resource groups exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Patients,
    Appointments,
    Invoices,
}

/// Operation performed on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Create,
    List,
    Read,
    Update,
    Delete,
}

use Role::{Admin, Doctor, Staff};

const ALL_ROLES: &[Role] = &[Admin, Doctor, Staff];
const ADMIN_DOCTOR: &[Role] = &[Admin, Doctor];
const ADMIN_STAFF: &[Role] = &[Admin, Staff];
const ADMIN_ONLY: &[Role] = &[Admin];

/// The static role-permission matrix.
pub fn allowed_roles(resource: Resource, verb: Verb) -> &'static [Role] {
    match (resource, verb) {
        (Resource::Patients, Verb::Create | Verb::List | Verb::Read) => ALL_ROLES,
        (Resource::Patients, Verb::Update) => ADMIN_DOCTOR,
        (Resource::Patients, Verb::Delete) => ADMIN_ONLY,

        (Resource::Appointments, Verb::Create | Verb::List | Verb::Read | Verb::Update) => {
            ALL_ROLES
        }
        (Resource::Appointments, Verb::Delete) => ADMIN_DOCTOR,

        (Resource::Invoices, Verb::Create | Verb::List | Verb::Read | Verb::Update) => ADMIN_STAFF,
        (Resource::Invoices, Verb::Delete) => ADMIN_ONLY,
    }
}

/// Check a resolved identity's role against the matrix.
///
/// Must only be called after authentication has resolved an identity;
/// an unauthenticated request never reaches this check.
pub fn authorize(role: Role, resource: Resource, verb: Verb) -> Result<(), AppError> {
    if allowed_roles(resource, verb).contains(&role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Access denied: insufficient permissions".to_string(),
        ))
    }
}
