use async_trait::async_trait;

use crate::{
    NewRegistration, NewTrip, RegistrationRecord, Result, TripId, TripQuery, TripRecord, Version,
};

/// Core trait for trip store implementations.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Inserts a new trip and returns the stored row with its assigned id.
    ///
    /// Fails with `UniqueViolation` if another trip already has the name.
    async fn insert_trip(&self, trip: NewTrip) -> Result<TripRecord>;

    /// Retrieves a trip by id.
    ///
    /// Returns None if the trip doesn't exist.
    async fn get_trip(&self, trip_id: TripId) -> Result<Option<TripRecord>>;

    /// Retrieves all trips matching a query, ordered by id.
    async fn list_trips(&self, query: TripQuery) -> Result<Vec<TripRecord>>;

    /// Writes back the editable fields of a trip.
    ///
    /// The write only happens if the stored version equals
    /// `expected_version`; otherwise it fails with `ConcurrencyConflict`.
    /// Returns the new version.
    async fn update_trip(&self, trip: &TripRecord, expected_version: Version) -> Result<Version>;

    /// Deletes a trip together with all of its registrations.
    ///
    /// Returns false if the trip didn't exist.
    async fn delete_trip(&self, trip_id: TripId) -> Result<bool>;

    /// Inserts a registration for a trip.
    ///
    /// The trip's version is checked against `expected_trip_version` and
    /// incremented in the same atomic step, so two registrations validated
    /// against the same snapshot of the trip cannot both be committed.
    ///
    /// Every registration bumps the version, not only the one taking the
    /// last seat. A concurrent registration with a different email, or an
    /// edit in flight, therefore fails with
    /// [`StoreError::ConcurrencyConflict`](crate::StoreError::ConcurrencyConflict) even when
    /// seats are free, and the caller has to reload and retry. Under heavy
    /// contention on one trip a row lock (`SELECT ... FOR UPDATE`) around the
    /// seat count would serialize writers instead of rejecting them.
    async fn insert_registration(
        &self,
        registration: NewRegistration,
        expected_trip_version: Version,
    ) -> Result<RegistrationRecord>;

    /// Retrieves all registrations of a trip, ordered by id.
    async fn registrations_for_trip(&self, trip_id: TripId) -> Result<Vec<RegistrationRecord>>;

    /// Counts the registrations of a trip.
    async fn count_registrations(&self, trip_id: TripId) -> Result<u32>;

    /// Returns true if the trip already has a registration with this exact email.
    async fn registration_exists(&self, trip_id: TripId, email_address: &str) -> Result<bool>;

    /// Returns true if a trip other than `excluding` has this exact name.
    async fn name_exists(&self, name: &str, excluding: Option<TripId>) -> Result<bool>;
}

/// Extension trait providing convenience methods for trip stores.
#[async_trait]
pub trait TripStoreExt: TripStore {
    /// Checks if a trip exists.
    async fn trip_exists(&self, trip_id: TripId) -> Result<bool> {
        Ok(self.get_trip(trip_id).await?.is_some())
    }

    /// Retrieves every trip.
    async fn all_trips(&self) -> Result<Vec<TripRecord>> {
        self.list_trips(TripQuery::new()).await
    }
}

// Blanket implementation for all TripStore implementations
impl<T: TripStore + ?Sized> TripStoreExt for T {}
