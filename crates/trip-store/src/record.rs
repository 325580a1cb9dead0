use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{RegistrationId, TripId};

/// Version stamp of a stored trip, used for optimistic concurrency control.
///
/// A trip is inserted at version 1. Every accepted update and every new
/// registration for the trip increments it by 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Creates a new version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the version of a trip that has never been stored (0).
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the version a trip gets when first inserted (1).
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version number.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Version> for i64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

/// A trip row as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRecord {
    pub id: TripId,
    pub name: String,
    pub country: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub number_of_seats: u32,
    pub version: Version,
}

/// Values for a trip that has not been inserted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrip {
    pub name: String,
    pub country: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub number_of_seats: u32,
}

impl NewTrip {
    /// Builds the stored row once the store has assigned an id.
    pub fn into_record(self, id: TripId) -> TripRecord {
        TripRecord {
            id,
            name: self.name,
            country: self.country,
            description: self.description,
            start_date: self.start_date,
            number_of_seats: self.number_of_seats,
            version: Version::first(),
        }
    }
}

/// A registration row as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    pub id: RegistrationId,
    pub trip_id: TripId,
    pub email_address: String,
}

/// Values for a registration that has not been inserted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub trip_id: TripId,
    pub email_address: String,
}
