//! Prometheus metrics endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

/// Registers help text for the counters the trip service emits.
pub fn describe() {
    metrics::describe_counter!("trips_created_total", "Trips created");
    metrics::describe_counter!("trips_updated_total", "Trip edits committed");
    metrics::describe_counter!("trips_deleted_total", "Trips deleted");
    metrics::describe_counter!(
        "trip_registrations_total",
        "Registrations accepted across all trips"
    );
    metrics::describe_counter!(
        "trip_rule_violations_total",
        "Requests rejected by a booking rule, by operation"
    );
}

/// GET /metrics: trip counters in Prometheus text format.
pub async fn get(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        handle.render(),
    )
}
