//! Business logic services

pub mod appointment;
pub mod auth;
pub mod invoice;
pub mod patient;

pub use appointment::AppointmentService;
pub use auth::AuthService;
pub use invoice::InvoiceService;
pub use patient::PatientService;
