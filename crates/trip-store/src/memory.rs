use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    NewRegistration, NewTrip, RegistrationId, RegistrationRecord, Result, StoreError, TripId,
    TripQuery, TripRecord, Version, store::TripStore,
};

#[derive(Debug, Default)]
struct State {
    trips: BTreeMap<TripId, TripRecord>,
    registrations: BTreeMap<RegistrationId, RegistrationRecord>,
    last_trip_id: i64,
    last_registration_id: i64,
}

impl State {
    fn name_taken(&self, name: &str, excluding: Option<TripId>) -> bool {
        self.trips
            .values()
            .any(|t| t.name == name && Some(t.id) != excluding)
    }

    fn email_taken(&self, trip_id: TripId, email_address: &str) -> bool {
        self.registrations
            .values()
            .any(|r| r.trip_id == trip_id && r.email_address == email_address)
    }

    fn check_version(&self, trip_id: TripId, expected: Version) -> Result<Version> {
        let actual = self
            .trips
            .get(&trip_id)
            .map(|t| t.version)
            .ok_or(StoreError::TripNotFound(trip_id))?;

        if actual != expected {
            return Err(StoreError::ConcurrencyConflict {
                trip_id,
                expected,
                actual,
            });
        }
        Ok(actual)
    }
}

/// In-memory trip store implementation.
///
/// Enforces the same unique indexes, cascade delete and version checks as
/// the PostgreSQL implementation. Cloning shares the underlying state.
#[derive(Clone, Default)]
pub struct InMemoryTripStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryTripStore {
    /// Creates a new empty in-memory trip store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of trips stored.
    pub async fn trip_count(&self) -> usize {
        self.state.read().await.trips.len()
    }

    /// Returns the total number of registrations stored, across all trips.
    pub async fn registration_count(&self) -> usize {
        self.state.read().await.registrations.len()
    }

    /// Clears all trips and registrations.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.trips.clear();
        state.registrations.clear();
    }
}

#[async_trait]
impl TripStore for InMemoryTripStore {
    async fn insert_trip(&self, trip: NewTrip) -> Result<TripRecord> {
        let mut state = self.state.write().await;

        if state.name_taken(&trip.name, None) {
            return Err(StoreError::UniqueViolation("trips_name_key".to_string()));
        }

        state.last_trip_id += 1;
        let record = trip.into_record(TripId::new(state.last_trip_id));
        state.trips.insert(record.id, record.clone());

        Ok(record)
    }

    async fn get_trip(&self, trip_id: TripId) -> Result<Option<TripRecord>> {
        Ok(self.state.read().await.trips.get(&trip_id).cloned())
    }

    async fn list_trips(&self, query: TripQuery) -> Result<Vec<TripRecord>> {
        let state = self.state.read().await;
        Ok(state
            .trips
            .values()
            .filter(|t| query.matches(&t.country))
            .cloned()
            .collect())
    }

    async fn update_trip(&self, trip: &TripRecord, expected_version: Version) -> Result<Version> {
        let mut state = self.state.write().await;

        let current = state.check_version(trip.id, expected_version)?;

        if state.name_taken(&trip.name, Some(trip.id)) {
            return Err(StoreError::UniqueViolation("trips_name_key".to_string()));
        }

        let new_version = current.next();
        let mut stored = trip.clone();
        stored.version = new_version;
        state.trips.insert(trip.id, stored);

        Ok(new_version)
    }

    async fn delete_trip(&self, trip_id: TripId) -> Result<bool> {
        let mut state = self.state.write().await;

        if state.trips.remove(&trip_id).is_none() {
            return Ok(false);
        }
        state.registrations.retain(|_, r| r.trip_id != trip_id);

        Ok(true)
    }

    async fn insert_registration(
        &self,
        registration: NewRegistration,
        expected_trip_version: Version,
    ) -> Result<RegistrationRecord> {
        let mut state = self.state.write().await;

        let current = state.check_version(registration.trip_id, expected_trip_version)?;

        if state.email_taken(registration.trip_id, &registration.email_address) {
            return Err(StoreError::UniqueViolation(
                "trip_registrations_trip_id_email_address_key".to_string(),
            ));
        }

        state.last_registration_id += 1;
        let record = RegistrationRecord {
            id: RegistrationId::new(state.last_registration_id),
            trip_id: registration.trip_id,
            email_address: registration.email_address,
        };
        state.registrations.insert(record.id, record.clone());

        if let Some(trip) = state.trips.get_mut(&record.trip_id) {
            trip.version = current.next();
        }

        Ok(record)
    }

    async fn registrations_for_trip(&self, trip_id: TripId) -> Result<Vec<RegistrationRecord>> {
        let state = self.state.read().await;
        Ok(state
            .registrations
            .values()
            .filter(|r| r.trip_id == trip_id)
            .cloned()
            .collect())
    }

    async fn count_registrations(&self, trip_id: TripId) -> Result<u32> {
        let state = self.state.read().await;
        let count = state
            .registrations
            .values()
            .filter(|r| r.trip_id == trip_id)
            .count();
        u32::try_from(count).map_err(|_| StoreError::OutOfRange {
            column: "registrations",
            value: i64::try_from(count).unwrap_or(i64::MAX),
        })
    }

    async fn registration_exists(&self, trip_id: TripId, email_address: &str) -> Result<bool> {
        Ok(self.state.read().await.email_taken(trip_id, email_address))
    }

    async fn name_exists(&self, name: &str, excluding: Option<TripId>) -> Result<bool> {
        Ok(self.state.read().await.name_taken(name, excluding))
    }
}
