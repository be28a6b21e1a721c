//! Prometheus metrics setup and metric definitions

use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder")
}

/// Register metric descriptions so the exposition output carries
/// HELP/TYPE lines from startup, not just after first use.
pub fn describe_metrics() {
    describe_counter!(
        "hms_requests_throttled_total",
        "Requests rejected by the rate limiter"
    );
    describe_counter!(
        "hms_auth_failures_total",
        "Requests rejected during authentication (missing, invalid, or expired credentials)"
    );
    describe_counter!(
        "hms_authz_denied_total",
        "Authenticated requests rejected by the role-permission matrix"
    );
}
