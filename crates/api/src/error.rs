//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{BusinessRule, DomainError};
use trip_store::StoreError;

/// Body message for any request naming a trip that doesn't exist.
pub const TRIP_NOT_FOUND: &str = "Trip was not found";

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match &err {
        DomainError::Trip(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        DomainError::TripNotFound(_) | DomainError::Store(StoreError::TripNotFound(_)) => {
            (StatusCode::NOT_FOUND, TRIP_NOT_FOUND.to_string())
        }
        DomainError::Store(StoreError::ConcurrencyConflict { .. }) => (
            StatusCode::CONFLICT,
            "The trip was changed by another request, please retry".to_string(),
        ),
        // A concurrent request won the race past the rule check
        DomainError::Store(StoreError::UniqueViolation(constraint)) => {
            let message = match constraint.as_str() {
                "trips_name_key" => BusinessRule::NameNotUnique.to_string(),
                "trip_registrations_trip_id_email_address_key" => {
                    BusinessRule::EmailAlreadyRegistered.to_string()
                }
                _ => err.to_string(),
            };
            (StatusCode::CONFLICT, message)
        }
        DomainError::Store(_) => internal(err.to_string()),
    }
}

fn internal(msg: String) -> (StatusCode, String) {
    tracing::error!(error = %msg, "internal server error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
