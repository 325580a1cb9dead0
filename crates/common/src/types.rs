use serde::{Deserialize, Serialize};

/// Identifier of a persisted trip.
///
/// Values are assigned by the store when a trip is first inserted, so a
/// trip that only exists in memory has no `TripId` yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(i64);

impl TripId {
    /// Wraps a raw store-assigned key.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw key.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TripId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TripId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<TripId> for i64 {
    fn from(id: TripId) -> Self {
        id.0
    }
}

/// Identifier of a persisted trip registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationId(i64);

impl RegistrationId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RegistrationId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<RegistrationId> for i64 {
    fn from(id: RegistrationId) -> Self {
        id.0
    }
}
