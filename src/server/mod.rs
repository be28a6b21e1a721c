//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::middleware::{inject_client_ip, pipeline_middleware, PipelineState};
use crate::migration;
use crate::repository::{
    AppointmentRepositoryImpl, InvoiceRepositoryImpl, PatientRepositoryImpl, UserRepositoryImpl,
};
use crate::service::{AppointmentService, AuthService, InvoiceService, PatientService};
use crate::state::HasServices;
use crate::telemetry;
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub auth_service: Arc<AuthService<UserRepositoryImpl>>,
    pub patient_service: Arc<PatientService<PatientRepositoryImpl>>,
    pub appointment_service: Arc<AppointmentService<AppointmentRepositoryImpl>>,
    pub invoice_service: Arc<InvoiceService<InvoiceRepositoryImpl>>,
    pub jwt_manager: JwtManager,
}

impl HasServices for AppState {
    type UserRepo = UserRepositoryImpl;
    type PatientRepo = PatientRepositoryImpl;
    type AppointmentRepo = AppointmentRepositoryImpl;
    type InvoiceRepo = InvoiceRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn auth_service(&self) -> &AuthService<Self::UserRepo> {
        &self.auth_service
    }

    fn patient_service(&self) -> &PatientService<Self::PatientRepo> {
        &self.patient_service
    }

    fn appointment_service(&self) -> &AppointmentService<Self::AppointmentRepo> {
        &self.appointment_service
    }

    fn invoice_service(&self) -> &InvoiceService<Self::InvoiceRepo> {
        &self.invoice_service
    }

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }
}

/// Run the server
pub async fn run(config: Config) -> Result<()> {
    migration::ensure_database_exists(&config).await?;

    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;
    info!("Connected to database");

    migration::run_migrations(&db_pool).await?;

    // Create repositories
    let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.clone()));
    let patient_repo = Arc::new(PatientRepositoryImpl::new(db_pool.clone()));
    let appointment_repo = Arc::new(AppointmentRepositoryImpl::new(db_pool.clone()));
    let invoice_repo = Arc::new(InvoiceRepositoryImpl::new(db_pool.clone()));

    // Create JWT manager and services
    let jwt_manager = JwtManager::new(config.jwt.clone());
    let auth_service = Arc::new(AuthService::new(user_repo, jwt_manager.clone()));
    let patient_service = Arc::new(PatientService::new(patient_repo));
    let appointment_service = Arc::new(AppointmentService::new(appointment_repo));
    let invoice_service = Arc::new(InvoiceService::new(invoice_repo));

    let state = AppState {
        config: Arc::new(config.clone()),
        db_pool,
        auth_service,
        patient_service,
        appointment_service,
        invoice_service,
        jwt_manager,
    };

    // Install metrics recorder
    let metrics_handle = telemetry::install_prometheus_recorder();
    telemetry::describe_metrics();

    let app = build_router(state, Arc::new(Some(metrics_handle)));

    let http_addr = config.http_addr();
    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Build the HTTP router.
///
/// Generic over the state type so the same routing code works with the
/// production `AppState` and mock-backed test states. Every gated route
/// passes through the request pipeline mounted as a route layer.
pub fn build_router<S: HasServices>(
    state: S,
    metrics_handle: Arc<Option<PrometheusHandle>>,
) -> Router {
    let pipeline_state = PipelineState::new(state.config(), state.jwt_manager().clone());

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let metrics_router = Router::new()
        .route("/metrics", get(api::metrics::metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        // Auth endpoints
        .route("/auth/register", post(api::auth::register::<S>))
        .route("/auth/login", post(api::auth::login::<S>))
        // Patient endpoints
        .route(
            "/patients",
            post(api::patient::create::<S>).get(api::patient::list::<S>),
        )
        .route(
            "/patients/{id}",
            get(api::patient::get::<S>)
                .put(api::patient::update::<S>)
                .delete(api::patient::delete::<S>),
        )
        // Appointment endpoints
        .route(
            "/appointments",
            post(api::appointment::create::<S>).get(api::appointment::list::<S>),
        )
        .route(
            "/appointments/{id}",
            axum::routing::put(api::appointment::update::<S>)
                .delete(api::appointment::delete::<S>),
        )
        // Billing endpoints
        .route(
            "/billing",
            post(api::invoice::create::<S>).get(api::invoice::list::<S>),
        )
        .route(
            "/billing/{id}",
            axum::routing::put(api::invoice::update::<S>).delete(api::invoice::delete::<S>),
        )
        // The request pipeline is a route layer so it sees the matched
        // path template for the policy lookup
        .route_layer(axum::middleware::from_fn_with_state(
            pipeline_state,
            pipeline_middleware,
        ))
        .layer(axum::middleware::from_fn(inject_client_ip))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
        .merge(metrics_router)
}
