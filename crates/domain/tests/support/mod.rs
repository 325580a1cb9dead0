//! Shared helpers for the domain integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use common::TripId;
use tokio::sync::Barrier;
use trip_store::{
    NewRegistration, NewTrip, RegistrationRecord, Result, TripQuery, TripRecord, TripStore,
    Version,
};

/// Store wrapper that holds every `count_registrations` call until
/// `parties` callers have reached it.
///
/// Two registrations running through a gated store therefore both finish
/// their rule checks before either one commits.
#[derive(Clone)]
pub struct GatedStore<S> {
    inner: S,
    barrier: Arc<Barrier>,
}

impl<S: TripStore> GatedStore<S> {
    pub fn new(inner: S, parties: usize) -> Self {
        Self::with_barrier(inner, Arc::new(Barrier::new(parties)))
    }

    /// Wraps `inner` so it waits on a barrier shared with other stores.
    pub fn with_barrier(inner: S, barrier: Arc<Barrier>) -> Self {
        Self { inner, barrier }
    }
}

#[async_trait]
impl<S: TripStore> TripStore for GatedStore<S> {
    async fn insert_trip(&self, trip: NewTrip) -> Result<TripRecord> {
        self.inner.insert_trip(trip).await
    }

    async fn get_trip(&self, trip_id: TripId) -> Result<Option<TripRecord>> {
        self.inner.get_trip(trip_id).await
    }

    async fn list_trips(&self, query: TripQuery) -> Result<Vec<TripRecord>> {
        self.inner.list_trips(query).await
    }

    async fn update_trip(&self, trip: &TripRecord, expected_version: Version) -> Result<Version> {
        self.inner.update_trip(trip, expected_version).await
    }

    async fn delete_trip(&self, trip_id: TripId) -> Result<bool> {
        self.inner.delete_trip(trip_id).await
    }

    async fn insert_registration(
        &self,
        registration: NewRegistration,
        expected_trip_version: Version,
    ) -> Result<RegistrationRecord> {
        self.inner
            .insert_registration(registration, expected_trip_version)
            .await
    }

    async fn registrations_for_trip(&self, trip_id: TripId) -> Result<Vec<RegistrationRecord>> {
        self.inner.registrations_for_trip(trip_id).await
    }

    async fn count_registrations(&self, trip_id: TripId) -> Result<u32> {
        let taken = self.inner.count_registrations(trip_id).await?;
        self.barrier.wait().await;
        Ok(taken)
    }

    async fn registration_exists(&self, trip_id: TripId, email_address: &str) -> Result<bool> {
        self.inner.registration_exists(trip_id, email_address).await
    }

    async fn name_exists(&self, name: &str, excluding: Option<TripId>) -> Result<bool> {
        self.inner.name_exists(name, excluding).await
    }
}
