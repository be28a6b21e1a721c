//! Application state trait for dependency injection.
//!
//! Handlers are generic over any state providing the required services,
//! so the same routing code serves both the production `AppState` and the
//! mock-backed states used in tests.

use crate::config::Config;
use crate::jwt::JwtManager;
use crate::repository::{
    AppointmentRepository, InvoiceRepository, PatientRepository, UserRepository,
};
use crate::service::{AppointmentService, AuthService, InvoiceService, PatientService};

pub trait HasServices: Clone + Send + Sync + 'static {
    /// The user repository type
    type UserRepo: UserRepository;
    /// The patient repository type
    type PatientRepo: PatientRepository;
    /// The appointment repository type
    type AppointmentRepo: AppointmentRepository;
    /// The invoice repository type
    type InvoiceRepo: InvoiceRepository;

    /// Get the application configuration
    fn config(&self) -> &Config;

    /// Get the auth service
    fn auth_service(&self) -> &AuthService<Self::UserRepo>;

    /// Get the patient service
    fn patient_service(&self) -> &PatientService<Self::PatientRepo>;

    /// Get the appointment service
    fn appointment_service(&self) -> &AppointmentService<Self::AppointmentRepo>;

    /// Get the invoice service
    fn invoice_service(&self) -> &InvoiceService<Self::InvoiceRepo>;

    /// Get the JWT manager
    fn jwt_manager(&self) -> &JwtManager;

    /// Check if the system is ready (database is healthy)
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}
