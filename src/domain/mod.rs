//! Domain models and per-endpoint validated input types

pub mod appointment;
pub mod common;
pub mod invoice;
pub mod patient;
pub mod user;

pub use appointment::{
    Appointment, AppointmentStatus, CreateAppointmentInput, UpdateAppointmentInput,
};
pub use common::StringUuid;
pub use invoice::{CreateInvoiceInput, Invoice, InvoiceItem, InvoiceStatus, UpdateInvoiceInput};
pub use patient::{CreatePatientInput, Gender, Patient, UpdatePatientInput};
pub use user::{LoginInput, RegisterInput, Role, User, UserProfile};
