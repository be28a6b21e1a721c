//! Per-route request pipeline.
//!
//! Every gated route passes through the same ordered chain:
//!
//! ```text
//! rate limit -> schema validation -> authentication -> authorization -> handler
//! ```
//!
//! Each stage either carries the request context forward or rejects with
//! a terminal error; the first rejection short-circuits everything after
//! it, handler included. Cheap anonymous checks (counters, shape checks)
//! deliberately run before signature verification and role lookup, so
//! malformed or abusive traffic is turned away at the lowest cost.
//!
//! The route policies are a single central table keyed by method and
//! matched path; authorization requirements are never scattered into
//! individual handlers.

use crate::config::{Config, RateLimitRule};
use crate::domain::{
    CreateAppointmentInput, CreateInvoiceInput, CreatePatientInput, LoginInput, RegisterInput,
    UpdateAppointmentInput, UpdateInvoiceInput, UpdatePatientInput,
};
use crate::error::{AppError, FieldViolation};
use crate::jwt::JwtManager;
use crate::middleware::auth::{extract_bearer_token, CurrentUser};
use crate::middleware::rate_limit::{extract_client_ip, FixedWindowLimiter};
use crate::policy::{self, Resource, Verb};
use axum::{
    body::{Body, Bytes},
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use std::{collections::HashMap, sync::Arc};
use uuid::Uuid;
use validator::Validate;

/// Largest request body the validation stage will buffer
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Access requirement of a route
#[derive(Debug, Clone, Copy)]
enum Access {
    /// No identity required
    Public,
    /// `x-admin-token` header must match the configured secret.
    /// This is an out-of-band gate, not a role check: registration
    /// happens before any user session exists.
    AdminToken,
    /// Bearer token required; the resolved role is checked against the
    /// role-permission matrix for this (resource, verb) pair
    Role(Resource, Verb),
}

/// Per-endpoint schema check, aggregated violations on failure
type SchemaCheck = fn(&Bytes) -> Result<(), AppError>;

/// Everything the pipeline enforces for one route
struct RoutePolicy {
    rate_limit: Option<RateLimitRule>,
    schema: Option<SchemaCheck>,
    check_path_id: bool,
    access: Access,
}

/// Shared state for the pipeline middleware
#[derive(Clone)]
pub struct PipelineState {
    jwt_manager: JwtManager,
    admin_register_token: String,
    limiter: Arc<FixedWindowLimiter>,
    policies: Arc<HashMap<String, RoutePolicy>>,
}

impl PipelineState {
    pub fn new(config: &Config, jwt_manager: JwtManager) -> Self {
        Self {
            jwt_manager,
            admin_register_token: config.admin_register_token.clone(),
            limiter: Arc::new(FixedWindowLimiter::new()),
            policies: Arc::new(route_policies(config)),
        }
    }
}

/// The central route-policy table.
fn route_policies(config: &Config) -> HashMap<String, RoutePolicy> {
    use Verb::*;

    let mut table = HashMap::new();

    table.insert(
        "POST:/auth/register".to_string(),
        RoutePolicy {
            rate_limit: Some(config.rate_limit.register.clone()),
            schema: Some(check_payload::<RegisterInput> as SchemaCheck),
            check_path_id: false,
            access: Access::AdminToken,
        },
    );
    table.insert(
        "POST:/auth/login".to_string(),
        RoutePolicy {
            rate_limit: Some(config.rate_limit.login.clone()),
            schema: Some(check_payload::<LoginInput> as SchemaCheck),
            check_path_id: false,
            access: Access::Public,
        },
    );

    table.insert(
        "POST:/patients".to_string(),
        RoutePolicy {
            rate_limit: None,
            schema: Some(check_payload::<CreatePatientInput> as SchemaCheck),
            check_path_id: false,
            access: Access::Role(Resource::Patients, Create),
        },
    );
    table.insert(
        "GET:/patients".to_string(),
        RoutePolicy {
            rate_limit: None,
            schema: None,
            check_path_id: false,
            access: Access::Role(Resource::Patients, List),
        },
    );
    table.insert(
        "GET:/patients/{id}".to_string(),
        RoutePolicy {
            rate_limit: None,
            schema: None,
            check_path_id: true,
            access: Access::Role(Resource::Patients, Read),
        },
    );
    table.insert(
        "PUT:/patients/{id}".to_string(),
        RoutePolicy {
            rate_limit: None,
            schema: Some(check_payload::<UpdatePatientInput> as SchemaCheck),
            check_path_id: true,
            access: Access::Role(Resource::Patients, Update),
        },
    );
    table.insert(
        "DELETE:/patients/{id}".to_string(),
        RoutePolicy {
            rate_limit: None,
            schema: None,
            check_path_id: true,
            access: Access::Role(Resource::Patients, Delete),
        },
    );

    table.insert(
        "POST:/appointments".to_string(),
        RoutePolicy {
            rate_limit: None,
            schema: Some(check_payload::<CreateAppointmentInput> as SchemaCheck),
            check_path_id: false,
            access: Access::Role(Resource::Appointments, Create),
        },
    );
    table.insert(
        "GET:/appointments".to_string(),
        RoutePolicy {
            rate_limit: None,
            schema: None,
            check_path_id: false,
            access: Access::Role(Resource::Appointments, List),
        },
    );
    table.insert(
        "PUT:/appointments/{id}".to_string(),
        RoutePolicy {
            rate_limit: None,
            schema: Some(check_payload::<UpdateAppointmentInput> as SchemaCheck),
            check_path_id: true,
            access: Access::Role(Resource::Appointments, Update),
        },
    );
    table.insert(
        "DELETE:/appointments/{id}".to_string(),
        RoutePolicy {
            rate_limit: None,
            schema: None,
            check_path_id: true,
            access: Access::Role(Resource::Appointments, Delete),
        },
    );

    table.insert(
        "POST:/billing".to_string(),
        RoutePolicy {
            rate_limit: None,
            schema: Some(check_payload::<CreateInvoiceInput> as SchemaCheck),
            check_path_id: false,
            access: Access::Role(Resource::Invoices, Create),
        },
    );
    table.insert(
        "GET:/billing".to_string(),
        RoutePolicy {
            rate_limit: None,
            schema: None,
            check_path_id: false,
            access: Access::Role(Resource::Invoices, List),
        },
    );
    table.insert(
        "PUT:/billing/{id}".to_string(),
        RoutePolicy {
            rate_limit: None,
            schema: Some(check_payload::<UpdateInvoiceInput> as SchemaCheck),
            check_path_id: true,
            access: Access::Role(Resource::Invoices, Update),
        },
    );
    table.insert(
        "DELETE:/billing/{id}".to_string(),
        RoutePolicy {
            rate_limit: None,
            schema: None,
            check_path_id: true,
            access: Access::Role(Resource::Invoices, Delete),
        },
    );

    table
}

/// Request context threaded through the stages. Identity appears once
/// the authentication stage has resolved it.
struct RequestContext {
    request: Request<Body>,
    identity: Option<CurrentUser>,
}

/// Outcome of a pipeline stage: carry on, or terminate with this error.
enum StageOutcome {
    Continue(RequestContext),
    Reject(AppError),
}

use StageOutcome::{Continue, Reject};

/// Pipeline middleware: folds the stage chain over the request,
/// short-circuiting on the first rejection.
pub async fn pipeline_middleware(
    State(state): State<PipelineState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let endpoint = endpoint_key(&request);
    let Some(route) = state.policies.get(&endpoint) else {
        // Route carries no policy (health, metrics); nothing to enforce
        return next.run(request).await;
    };

    let ctx = RequestContext {
        request,
        identity: None,
    };

    let outcome = rate_limit_stage(&state, route, &endpoint, ctx);
    let outcome = match outcome {
        Continue(ctx) => validation_stage(route, ctx).await,
        reject => reject,
    };
    let outcome = match outcome {
        Continue(ctx) => authentication_stage(&state, route, &endpoint, ctx),
        reject => reject,
    };
    let outcome = match outcome {
        Continue(ctx) => authorization_stage(route, &endpoint, ctx),
        reject => reject,
    };

    match outcome {
        Continue(ctx) => next.run(ctx.request).await,
        Reject(err) => err.into_response(),
    }
}

fn rate_limit_stage(
    state: &PipelineState,
    route: &RoutePolicy,
    endpoint: &str,
    ctx: RequestContext,
) -> StageOutcome {
    let Some(rule) = &route.rate_limit else {
        return Continue(ctx);
    };

    let ip = extract_client_ip(&ctx.request);
    let key = format!("{}:{}", endpoint, ip);
    match state.limiter.check(&key, rule) {
        Ok(()) => Continue(ctx),
        Err(err) => {
            metrics::counter!("hms_requests_throttled_total", "endpoint" => endpoint.to_string())
                .increment(1);
            tracing::debug!(endpoint, ip = %ip, "request throttled");
            Reject(err)
        }
    }
}

async fn validation_stage(route: &RoutePolicy, ctx: RequestContext) -> StageOutcome {
    if route.check_path_id {
        let path = ctx.request.uri().path();
        let id = path.rsplit('/').next().unwrap_or_default();
        if Uuid::parse_str(id).is_err() {
            return Reject(AppError::validation("id", "Invalid ID format"));
        }
    }

    let Some(check) = route.schema else {
        return Continue(ctx);
    };

    let (parts, body) = ctx.request.into_parts();
    let bytes = match axum::body::to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return Reject(AppError::Internal(anyhow::anyhow!(
                "Failed to read request body: {}",
                e
            )))
        }
    };

    if let Err(err) = check(&bytes) {
        return Reject(err);
    }

    // Hand the buffered body back so the handler can deserialize it
    Continue(RequestContext {
        request: Request::from_parts(parts, Body::from(bytes)),
        identity: ctx.identity,
    })
}

fn authentication_stage(
    state: &PipelineState,
    route: &RoutePolicy,
    endpoint: &str,
    mut ctx: RequestContext,
) -> StageOutcome {
    match route.access {
        Access::Public => Continue(ctx),
        Access::AdminToken => {
            let supplied = ctx
                .request
                .headers()
                .get("x-admin-token")
                .and_then(|v| v.to_str().ok());
            if supplied == Some(state.admin_register_token.as_str()) {
                Continue(ctx)
            } else {
                metrics::counter!("hms_auth_failures_total", "endpoint" => endpoint.to_string())
                    .increment(1);
                Reject(AppError::Forbidden(
                    "Registration requires a valid admin token".to_string(),
                ))
            }
        }
        Access::Role(..) => {
            let resolved = extract_bearer_token(ctx.request.headers())
                .and_then(|token| Ok(state.jwt_manager.verify_token(token)?))
                .and_then(CurrentUser::from_claims);

            match resolved {
                Ok(user) => {
                    ctx.identity = Some(user);
                    Continue(ctx)
                }
                Err(err) => {
                    metrics::counter!("hms_auth_failures_total", "endpoint" => endpoint.to_string())
                        .increment(1);
                    Reject(err.into())
                }
            }
        }
    }
}

fn authorization_stage(route: &RoutePolicy, endpoint: &str, ctx: RequestContext) -> StageOutcome {
    let Access::Role(resource, verb) = route.access else {
        return Continue(ctx);
    };

    // Authentication has already run; a missing identity here means the
    // stage ordering was broken, and the request must not proceed.
    let Some(user) = &ctx.identity else {
        return Reject(AppError::Unauthenticated(
            "Missing authorization token".to_string(),
        ));
    };

    match policy::authorize(user.role, resource, verb) {
        Ok(()) => Continue(ctx),
        Err(err) => {
            metrics::counter!("hms_authz_denied_total", "endpoint" => endpoint.to_string())
                .increment(1);
            tracing::debug!(endpoint, role = %user.role, "authorization denied");
            Reject(err)
        }
    }
}

/// "METHOD:path" key for the policy table, using the matched route
/// template when available
fn endpoint_key(request: &Request<Body>) -> String {
    let method = request.method().as_str();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| normalize_path(request.uri().path()));
    format!("{}:{}", method, path)
}

/// Fall back to collapsing id-shaped segments into the route template
/// when the router did not attach a matched path
fn normalize_path(path: &str) -> String {
    let normalized: Vec<String> = path
        .split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{id}".to_string()
            } else {
                segment.to_string()
            }
        })
        .collect();
    normalized.join("/")
}

/// Deserialize the payload into its endpoint input type and run every
/// field rule, aggregating all violations.
fn check_payload<T: DeserializeOwned + Validate>(body: &Bytes) -> Result<(), AppError> {
    let payload: T = serde_json::from_slice(body).map_err(|e| {
        AppError::Validation(vec![FieldViolation {
            field: "body".to_string(),
            message: format!("Malformed JSON body: {}", e),
        }])
    })?;
    payload.validate()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DatabaseConfig, JwtConfig, RateLimitConfig};
    use crate::domain::{Role, StringUuid, User};
    use axum::{
        http::{Request as HttpRequest, StatusCode},
        routing::{get, post, put},
        Router,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config {
            http_host: "127.0.0.1".to_string(),
            http_port: 5000,
            database: DatabaseConfig {
                url: "mysql://localhost/test".to_string(),
                max_connections: 10,
                min_connections: 2,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-for-testing-purposes-only".to_string(),
                issuer: "hms-core".to_string(),
                access_token_ttl_secs: 3600,
            },
            admin_register_token: "super-secret-admin-token".to_string(),
            rate_limit: RateLimitConfig::default(),
        }
    }

    async fn ok_handler() -> &'static str {
        "ok"
    }

    fn test_app(config: &Config) -> (Router, JwtManager) {
        let jwt_manager = JwtManager::new(config.jwt.clone());
        let state = PipelineState::new(config, jwt_manager.clone());

        let app = Router::new()
            .route("/health", get(ok_handler))
            .route("/auth/register", post(ok_handler))
            .route("/auth/login", post(ok_handler))
            .route("/patients", post(ok_handler).get(ok_handler))
            .route(
                "/patients/{id}",
                get(ok_handler).put(ok_handler).delete(ok_handler),
            )
            .route("/appointments", post(ok_handler).get(ok_handler))
            .route("/appointments/{id}", put(ok_handler).delete(ok_handler))
            .route("/billing", post(ok_handler).get(ok_handler))
            .route("/billing/{id}", put(ok_handler).delete(ok_handler))
            // route_layer so the matched path template is available
            .route_layer(axum::middleware::from_fn_with_state(
                state,
                pipeline_middleware,
            ));

        (app, jwt_manager)
    }

    fn token_for(jwt_manager: &JwtManager, role: Role) -> String {
        let user = User {
            role,
            ..Default::default()
        };
        jwt_manager.create_token(&user).unwrap()
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", "198.51.100.7");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), BODY_LIMIT)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthenticated() {
        let config = test_config();
        let (app, _) = test_app(&config);

        let response = app
            .oneshot(request("GET", "/patients", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Missing authorization token");
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthenticated() {
        let config = test_config();
        let (app, _) = test_app(&config);

        let response = app
            .oneshot(request("GET", "/patients", Some("garbage"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid token");
    }

    #[tokio::test]
    async fn test_expired_token_is_distinguishable() {
        let config = test_config();
        let (app, _) = test_app(&config);

        let mut expired_jwt = config.jwt.clone();
        expired_jwt.access_token_ttl_secs = -30;
        let token = JwtManager::new(expired_jwt)
            .create_token(&User::default())
            .unwrap();

        let response = app
            .oneshot(request("GET", "/patients", Some(&token), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Token has expired");
    }

    #[tokio::test]
    async fn test_staff_cannot_delete_patient_but_can_create() {
        let config = test_config();
        let (app, jwt_manager) = test_app(&config);
        let token = token_for(&jwt_manager, Role::Staff);
        let id = StringUuid::new_v4();

        let response = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/patients/{}", id),
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(request(
                "POST",
                "/patients",
                Some(&token),
                Some(json!({
                    "name": "Jane Doe",
                    "age": 34,
                    "gender": "Female",
                    "contact": "555-0117"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_can_delete_patient() {
        let config = test_config();
        let (app, jwt_manager) = test_app(&config);
        let token = token_for(&jwt_manager, Role::Admin);
        let id = StringUuid::new_v4();

        let response = app
            .oneshot(request(
                "DELETE",
                &format!("/patients/{}", id),
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_doctor_cannot_reach_billing() {
        let config = test_config();
        let (app, jwt_manager) = test_app(&config);
        let token = token_for(&jwt_manager, Role::Doctor);

        let response = app
            .oneshot(request("GET", "/billing", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_path_id_checked_before_authentication() {
        let config = test_config();
        let (app, _) = test_app(&config);

        // No token at all: the malformed id must be reported first,
        // because shape checks run before identity resolution
        let response = app
            .oneshot(request("DELETE", "/patients/12345", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["field"], "id");
        assert_eq!(body["errors"][0]["message"], "Invalid ID format");
    }

    #[tokio::test]
    async fn test_register_without_admin_token_is_forbidden() {
        let config = test_config();
        let (app, _) = test_app(&config);

        let response = app
            .oneshot(request(
                "POST",
                "/auth/register",
                None,
                Some(json!({
                    "username": "newstaff",
                    "password": "password123",
                    "name": "New Staff",
                    "role": "staff"
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Registration requires a valid admin token");
    }

    #[tokio::test]
    async fn test_register_with_admin_token_passes_gate() {
        let config = test_config();
        let (app, _) = test_app(&config);

        let mut req = request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "username": "newstaff",
                "password": "password123",
                "name": "New Staff",
                "role": "staff"
            })),
        );
        req.headers_mut()
            .insert("x-admin-token", "super-secret-admin-token".parse().unwrap());

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_validation_aggregates_all_violations() {
        let config = test_config();
        let (app, _) = test_app(&config);

        // Validation runs before the admin gate, so no x-admin-token is needed
        let response = app
            .oneshot(request(
                "POST",
                "/auth/register",
                None,
                Some(json!({
                    "username": "ab",
                    "password": "x",
                    "name": "",
                    "role": "superuser"
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 4);
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_validation_error() {
        let config = test_config();
        let (app, jwt_manager) = test_app(&config);
        let token = token_for(&jwt_manager, Role::Admin);

        let req = HttpRequest::builder()
            .method("POST")
            .uri("/patients")
            .header("authorization", format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["field"], "body");
    }

    #[tokio::test]
    async fn test_login_rate_limit_admits_ten_rejects_eleventh() {
        let config = test_config();
        let (app, _) = test_app(&config);

        let login_body = json!({ "username": "admin", "password": "password123" });

        for _ in 0..10 {
            let response = app
                .clone()
                .oneshot(request("POST", "/auth/login", None, Some(login_body.clone())))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(request("POST", "/auth/login", None, Some(login_body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("retry-after"));
        let body = body_json(response).await;
        assert_eq!(
            body["message"],
            "Too many login attempts. Please try again after 15 minutes."
        );
    }

    #[tokio::test]
    async fn test_register_rate_limit_is_stricter() {
        let config = test_config();
        let (app, _) = test_app(&config);

        // Invalid body on purpose: rate limiting runs before validation,
        // so even rejected payloads consume the budget
        for _ in 0..5 {
            let response = app
                .clone()
                .oneshot(request("POST", "/auth/register", None, Some(json!({}))))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        let response = app
            .oneshot(request("POST", "/auth/register", None, Some(json!({}))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_rate_limit_keys_by_client_address() {
        let config = test_config();
        let (app, _) = test_app(&config);

        let login_body = json!({ "username": "admin", "password": "password123" });

        for _ in 0..10 {
            app.clone()
                .oneshot(request("POST", "/auth/login", None, Some(login_body.clone())))
                .await
                .unwrap();
        }

        // Same endpoint, different client: fresh window
        let mut req = request("POST", "/auth/login", None, Some(login_body));
        req.headers_mut()
            .insert("x-forwarded-for", "203.0.113.99".parse().unwrap());
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unpolicied_route_passes_through() {
        let config = test_config();
        let (app, _) = test_app(&config);

        let response = app
            .oneshot(request("GET", "/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_schema_enforced_on_put() {
        let config = test_config();
        let (app, jwt_manager) = test_app(&config);
        let token = token_for(&jwt_manager, Role::Doctor);
        let id = StringUuid::new_v4();

        let response = app
            .oneshot(request(
                "PUT",
                &format!("/patients/{}", id),
                Some(&token),
                Some(json!({ "age": 200, "gender": "female" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_normalize_path_collapses_uuid_segments() {
        assert_eq!(
            normalize_path("/patients/550e8400-e29b-41d4-a716-446655440000"),
            "/patients/{id}"
        );
        assert_eq!(normalize_path("/patients"), "/patients");
    }

    #[test]
    fn test_policy_table_covers_every_gated_route() {
        let config = test_config();
        let table = route_policies(&config);

        for key in [
            "POST:/auth/register",
            "POST:/auth/login",
            "POST:/patients",
            "GET:/patients",
            "GET:/patients/{id}",
            "PUT:/patients/{id}",
            "DELETE:/patients/{id}",
            "POST:/appointments",
            "GET:/appointments",
            "PUT:/appointments/{id}",
            "DELETE:/appointments/{id}",
            "POST:/billing",
            "GET:/billing",
            "PUT:/billing/{id}",
            "DELETE:/billing/{id}",
        ] {
            assert!(table.contains_key(key), "missing policy for {}", key);
        }
        assert_eq!(table.len(), 15);
    }
}
