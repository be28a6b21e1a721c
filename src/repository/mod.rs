//! Data access layer.
//!
//! Each repository is a trait (mockable in tests) with a sqlx-backed
//! implementation. The core pipeline never touches these directly; only
//! handlers and services do, after every gate has passed.

pub mod appointment;
pub mod invoice;
pub mod patient;
pub mod user;

pub use appointment::{AppointmentRepository, AppointmentRepositoryImpl};
pub use invoice::{InvoiceRepository, InvoiceRepositoryImpl};
pub use patient::{PatientRepository, PatientRepositoryImpl};
pub use user::{UserRepository, UserRepositoryImpl};
