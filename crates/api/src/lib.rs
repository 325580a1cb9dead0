//! HTTP API server with observability for the trip booking service.
//!
//! Provides REST endpoints for trips and trip registrations,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use domain::TripService;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use trip_store::TripStore;

use routes::trips::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: TripStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/api/trips",
            get(routes::trips::list::<S>).post(routes::trips::create::<S>),
        )
        .route(
            "/api/trips/{id}",
            get(routes::trips::get::<S>)
                .put(routes::trips::update::<S>)
                .delete(routes::trips::delete::<S>),
        )
        .route(
            "/api/trips/{id}/registrations",
            get(routes::trips::registrations::<S>).post(routes::trips::register::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over the given trip store.
pub fn create_default_state<S: TripStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState {
        trip_service: TripService::new(store),
    })
}
