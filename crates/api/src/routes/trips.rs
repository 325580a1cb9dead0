//! Trip CRUD and registration endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::{DateTime, SubsecRound, Utc};
use common::{RegistrationId, TripId};
use domain::{
    CreateTrip, EditTrip, EmailAddress, RegisterForTrip, Trip, TripDetails, TripRegistration,
    TripService,
};
use serde::{Deserialize, Serialize};
use trip_store::TripStore;

use crate::error::{ApiError, TRIP_NOT_FOUND};

const MAX_NAME_LEN: usize = 50;
const MAX_COUNTRY_LEN: usize = 20;
const MIN_SEATS: i64 = 1;
const MAX_SEATS: i64 = 100;

/// Shared application state accessible from all handlers.
pub struct AppState<S: TripStore + Clone> {
    pub trip_service: TripService<S>,
}

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct ListTripsQuery {
    pub country: Option<String>,
}

/// Body of both trip creation and trip edit.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub name: String,
    pub country: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub number_of_seats: i64,
}

impl TripRequest {
    /// Checks field lengths and the seat range, returning the details and seat count.
    fn validate(self) -> Result<(TripDetails, u32), ApiError> {
        require_text("name", &self.name, Some(MAX_NAME_LEN))?;
        require_text("country", &self.country, Some(MAX_COUNTRY_LEN))?;
        require_text("description", &self.description, None)?;

        if !(MIN_SEATS..=MAX_SEATS).contains(&self.number_of_seats) {
            return Err(ApiError::BadRequest(format!(
                "numberOfSeats must be between {MIN_SEATS} and {MAX_SEATS}"
            )));
        }
        let seats = u32::try_from(self.number_of_seats)
            .map_err(|_| ApiError::BadRequest("numberOfSeats is out of range".to_string()))?;

        // Stored as TIMESTAMPTZ, which keeps microseconds.
        let start_date = self.start_date.trunc_subsecs(6);
        let details = TripDetails::new(self.name, self.country, self.description, start_date);
        Ok((details, seats))
    }
}

fn require_text(field: &str, value: &str, max_len: Option<usize>) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{field} is required")));
    }
    if let Some(max) = max_len
        && value.chars().count() > max
    {
        return Err(ApiError::BadRequest(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForTripRequest {
    pub email_address: String,
}

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripListItemResponse {
    pub id: Option<TripId>,
    pub name: String,
    pub country: String,
    pub start_date: DateTime<Utc>,
}

impl From<&Trip> for TripListItemResponse {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id(),
            name: trip.name().to_string(),
            country: trip.country().to_string(),
            start_date: trip.start_date(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDetailsResponse {
    pub id: Option<TripId>,
    pub name: String,
    pub country: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub number_of_seats: u32,
}

impl From<&Trip> for TripDetailsResponse {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id(),
            name: trip.name().to_string(),
            country: trip.country().to_string(),
            description: trip.description().to_string(),
            start_date: trip.start_date(),
            number_of_seats: trip.number_of_seats(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub id: Option<RegistrationId>,
    pub trip_id: TripId,
    pub email_address: String,
}

impl From<&TripRegistration> for RegistrationResponse {
    fn from(registration: &TripRegistration) -> Self {
        Self {
            id: registration.id(),
            trip_id: registration.trip_id(),
            email_address: registration.email_address().to_string(),
        }
    }
}

// -- Handlers --

/// GET /api/trips: list trips, optionally filtered by `?country=`.
#[tracing::instrument(skip(state))]
pub async fn list<S: TripStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListTripsQuery>,
) -> Result<Json<Vec<TripListItemResponse>>, ApiError> {
    let trips = state
        .trip_service
        .list_trips(query.country.as_deref())
        .await?;

    Ok(Json(trips.iter().map(TripListItemResponse::from).collect()))
}

/// GET /api/trips/{id}: load a trip's details.
#[tracing::instrument(skip(state))]
pub async fn get<S: TripStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(trip_id): Path<TripId>,
) -> Result<Json<TripDetailsResponse>, ApiError> {
    let trip = state
        .trip_service
        .get_trip(trip_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(TRIP_NOT_FOUND.to_string()))?;

    Ok(Json(TripDetailsResponse::from(&trip)))
}

/// POST /api/trips: create a trip.
///
/// Responds 201 with the new trip's location.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: TripStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<TripRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let (details, number_of_seats) = req.validate()?;

    let trip = state
        .trip_service
        .create_trip(CreateTrip::new(details, number_of_seats))
        .await?;

    let location = trip
        .id()
        .map(|id| format!("/api/trips/{id}"))
        .unwrap_or_default();

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TripDetailsResponse::from(&trip)),
    ))
}

/// PUT /api/trips/{id}: replace a trip's details and seat count.
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: TripStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(trip_id): Path<TripId>,
    payload: Result<Json<TripRequest>, JsonRejection>,
) -> Result<Json<TripDetailsResponse>, ApiError> {
    let Json(req) = payload?;
    let (details, number_of_seats) = req.validate()?;

    let trip = state
        .trip_service
        .edit_trip(trip_id, EditTrip::new(details, number_of_seats))
        .await?;

    Ok(Json(TripDetailsResponse::from(&trip)))
}

/// DELETE /api/trips/{id}: delete a trip and its registrations.
#[tracing::instrument(skip(state))]
pub async fn delete<S: TripStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(trip_id): Path<TripId>,
) -> Result<StatusCode, ApiError> {
    state.trip_service.delete_trip(trip_id).await?;
    Ok(StatusCode::OK)
}

/// POST /api/trips/{id}/registrations: register an email address for a trip.
#[tracing::instrument(skip(state, payload))]
pub async fn register<S: TripStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(trip_id): Path<TripId>,
    payload: Result<Json<RegisterForTripRequest>, JsonRejection>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let Json(req) = payload?;
    let email_address =
        EmailAddress::parse(req.email_address).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let registration = state
        .trip_service
        .register_for_trip(trip_id, RegisterForTrip::new(email_address))
        .await?;

    Ok(Json(RegistrationResponse::from(&registration)))
}

/// GET /api/trips/{id}/registrations: list a trip's registrations.
#[tracing::instrument(skip(state))]
pub async fn registrations<S: TripStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(trip_id): Path<TripId>,
) -> Result<Json<Vec<RegistrationResponse>>, ApiError> {
    let registrations = state.trip_service.registrations(trip_id).await?;

    Ok(Json(
        registrations
            .iter()
            .map(RegistrationResponse::from)
            .collect(),
    ))
}
