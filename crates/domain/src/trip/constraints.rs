//! Uniqueness and capacity queries the trip aggregate depends on.

use async_trait::async_trait;
use common::TripId;
use trip_store::{StoreError, TripStore};

/// Read-only queries answering the trip rules' questions about stored state.
///
/// Every call is a fresh query; implementations must not cache answers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConstraintsChecker: Send + Sync {
    /// Returns true iff no registration of the trip has exactly this email.
    async fn is_reservation_email_unique(
        &self,
        trip_id: TripId,
        email_address: &str,
    ) -> Result<bool, StoreError>;

    /// Returns the number of registrations of the trip.
    async fn seats_taken(&self, trip_id: TripId) -> Result<u32, StoreError>;

    /// Returns true iff no trip other than `excluding` has exactly this name.
    async fn is_name_unique(
        &self,
        name: &str,
        excluding: Option<TripId>,
    ) -> Result<bool, StoreError>;
}

/// Constraints checker answering from a [`TripStore`].
#[derive(Debug, Clone)]
pub struct StoreConstraintsChecker<S> {
    store: S,
}

impl<S: TripStore> StoreConstraintsChecker<S> {
    /// Creates a checker querying the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: TripStore> ConstraintsChecker for StoreConstraintsChecker<S> {
    async fn is_reservation_email_unique(
        &self,
        trip_id: TripId,
        email_address: &str,
    ) -> Result<bool, StoreError> {
        Ok(!self
            .store
            .registration_exists(trip_id, email_address)
            .await?)
    }

    async fn seats_taken(&self, trip_id: TripId) -> Result<u32, StoreError> {
        self.store.count_registrations(trip_id).await
    }

    async fn is_name_unique(
        &self,
        name: &str,
        excluding: Option<TripId>,
    ) -> Result<bool, StoreError> {
        Ok(!self.store.name_exists(name, excluding).await?)
    }
}
