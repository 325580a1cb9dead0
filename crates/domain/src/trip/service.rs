//! Trip service providing the application-level API for trip operations.

use common::TripId;
use trip_store::{TripQuery, TripStore, TripStoreExt};

use crate::error::DomainError;

use super::{
    CreateTrip, EditTrip, RegisterForTrip, StoreConstraintsChecker, Trip, TripRegistration,
};

/// Service for managing trips and their registrations.
///
/// Loads trips from the store, runs the aggregate's rules against a
/// [`StoreConstraintsChecker`] over the same store, and writes the result
/// back. Writes carry the version the trip was loaded at, so a request that
/// lost a race fails with a concurrency conflict instead of overbooking.
#[derive(Clone)]
pub struct TripService<S: TripStore + Clone> {
    store: S,
    checker: StoreConstraintsChecker<S>,
}

impl<S: TripStore + Clone> TripService<S> {
    /// Creates a new trip service over the given store.
    pub fn new(store: S) -> Self {
        Self {
            checker: StoreConstraintsChecker::new(store.clone()),
            store,
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lists trips, optionally only those in `country`.
    ///
    /// An empty country is treated as no filter.
    #[tracing::instrument(skip(self))]
    pub async fn list_trips(&self, country: Option<&str>) -> Result<Vec<Trip>, DomainError> {
        let query = match country {
            Some(country) => TripQuery::new().country(country),
            None => TripQuery::new(),
        };

        let records = self.store.list_trips(query).await?;
        Ok(records.into_iter().map(Trip::from_record).collect())
    }

    /// Loads a trip by id.
    ///
    /// Returns None if the trip doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_trip(&self, trip_id: TripId) -> Result<Option<Trip>, DomainError> {
        Ok(self.store.get_trip(trip_id).await?.map(Trip::from_record))
    }

    /// Creates and stores a new trip.
    #[tracing::instrument(skip(self))]
    pub async fn create_trip(&self, cmd: CreateTrip) -> Result<Trip, DomainError> {
        let trip = Trip::create_new(cmd.details, cmd.number_of_seats, &self.checker)
            .await
            .inspect_err(|e| note_violation("create_trip", e))?;

        let record = self.store.insert_trip(trip.to_new_trip()).await?;
        let trip = Trip::from_record(record);

        metrics::counter!("trips_created_total").increment(1);
        tracing::info!(trip_id = ?trip.id(), name = trip.name(), "Trip created");

        Ok(trip)
    }

    /// Replaces the details and seat count of a trip.
    ///
    /// Both changes are validated before anything is written, and are
    /// written together.
    #[tracing::instrument(skip(self))]
    pub async fn edit_trip(&self, trip_id: TripId, cmd: EditTrip) -> Result<Trip, DomainError> {
        let mut trip = self.load(trip_id).await?;

        trip.edit_details(cmd.details, &self.checker)
            .await
            .inspect_err(|e| note_violation("edit_trip", e))?;
        trip.update_number_of_seats(cmd.number_of_seats, &self.checker)
            .await
            .inspect_err(|e| note_violation("edit_trip", e))?;

        let mut record = trip.to_record()?;
        record.version = self.store.update_trip(&record, trip.version()).await?;

        metrics::counter!("trips_updated_total").increment(1);
        tracing::info!(%trip_id, version = %record.version, "Trip updated");

        Ok(Trip::from_record(record))
    }

    /// Deletes a trip and all of its registrations.
    #[tracing::instrument(skip(self))]
    pub async fn delete_trip(&self, trip_id: TripId) -> Result<(), DomainError> {
        if !self.store.delete_trip(trip_id).await? {
            return Err(DomainError::TripNotFound(trip_id));
        }

        metrics::counter!("trips_deleted_total").increment(1);
        tracing::info!(%trip_id, "Trip deleted");

        Ok(())
    }

    /// Registers an email address for a trip.
    #[tracing::instrument(skip(self))]
    pub async fn register_for_trip(
        &self,
        trip_id: TripId,
        cmd: RegisterForTrip,
    ) -> Result<TripRegistration, DomainError> {
        let trip = self.load(trip_id).await?;

        let registration = trip
            .create_registration(cmd.email_address, &self.checker)
            .await
            .inspect_err(|e| note_violation("register_for_trip", e))?;

        let record = self
            .store
            .insert_registration(registration.to_new_registration(), trip.version())
            .await?;

        metrics::counter!("trip_registrations_total").increment(1);
        tracing::info!(%trip_id, registration_id = %record.id, "Trip registration created");

        Ok(TripRegistration::from_record(record)?)
    }

    /// Lists the registrations of a trip, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn registrations(
        &self,
        trip_id: TripId,
    ) -> Result<Vec<TripRegistration>, DomainError> {
        if !self.store.trip_exists(trip_id).await? {
            return Err(DomainError::TripNotFound(trip_id));
        }

        self.store
            .registrations_for_trip(trip_id)
            .await?
            .into_iter()
            .map(|record| TripRegistration::from_record(record).map_err(DomainError::from))
            .collect()
    }

    async fn load(&self, trip_id: TripId) -> Result<Trip, DomainError> {
        self.get_trip(trip_id)
            .await?
            .ok_or(DomainError::TripNotFound(trip_id))
    }
}

fn note_violation(operation: &'static str, error: &DomainError) {
    if error.is_rule_violation() {
        metrics::counter!("trip_rule_violations_total", "operation" => operation).increment(1);
        tracing::info!(operation, %error, "Trip rule violated");
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use trip_store::InMemoryTripStore;

    use super::*;
    use crate::trip::{BusinessRule, EmailAddress, TripDetails, TripError};

    fn create_service() -> TripService<InMemoryTripStore> {
        TripService::new(InMemoryTripStore::new())
    }

    fn details(name: &str, country: &str) -> TripDetails {
        TripDetails::new(
            name,
            country,
            "Lorem ipsum dolor sit amet",
            Utc::now() + Duration::days(30),
        )
    }

    fn register(email: &str) -> RegisterForTrip {
        RegisterForTrip::new(EmailAddress::parse(email).unwrap())
    }

    fn assert_rule<T: std::fmt::Debug>(result: Result<T, DomainError>, rule: BusinessRule) {
        match result {
            Err(DomainError::Trip(TripError::BusinessRuleViolation(actual))) => {
                assert_eq!(actual, rule)
            }
            other => panic!("expected {rule:?}, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_trip() {
        let service = create_service();

        let trip = service
            .create_trip(CreateTrip::new(details("Pyramids", "Egypt"), 10))
            .await
            .unwrap();

        assert_eq!(trip.id(), Some(TripId::new(1)));
        assert_eq!(trip.name(), "Pyramids");
        assert_eq!(trip.number_of_seats(), 10);
        assert_eq!(service.store().trip_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_trip_with_taken_name() {
        let service = create_service();
        service
            .create_trip(CreateTrip::new(details("Pyramids", "Egypt"), 10))
            .await
            .unwrap();

        let result = service
            .create_trip(CreateTrip::new(details("Pyramids", "Poland"), 5))
            .await;

        assert_rule(result, BusinessRule::NameNotUnique);
        assert_eq!(service.store().trip_count().await, 1);
    }

    #[tokio::test]
    async fn test_list_trips_by_country() {
        let service = create_service();
        for (name, country) in [("A", "Egypt"), ("B", "Poland"), ("C", "Egypt")] {
            service
                .create_trip(CreateTrip::new(details(name, country), 10))
                .await
                .unwrap();
        }

        let egypt = service.list_trips(Some("Egypt")).await.unwrap();
        let names: Vec<_> = egypt.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["A", "C"]);

        assert_eq!(service.list_trips(None).await.unwrap().len(), 3);
        assert_eq!(service.list_trips(Some("")).await.unwrap().len(), 3);
        assert!(service.list_trips(Some("Peru")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_trip() {
        let service = create_service();

        assert!(service.get_trip(TripId::new(1)).await.unwrap().is_none());

        let created = service
            .create_trip(CreateTrip::new(details("Pyramids", "Egypt"), 10))
            .await
            .unwrap();
        let loaded = service.get_trip(TripId::new(1)).await.unwrap().unwrap();

        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn test_edit_trip() {
        let service = create_service();
        let trip = service
            .create_trip(CreateTrip::new(details("Pyramids", "Egypt"), 10))
            .await
            .unwrap();
        let trip_id = trip.id().unwrap();

        let edited = service
            .edit_trip(trip_id, EditTrip::new(details("Luxor", "Egypt"), 20))
            .await
            .unwrap();

        assert_eq!(edited.name(), "Luxor");
        assert_eq!(edited.number_of_seats(), 20);
        assert_eq!(edited.version(), trip.version().next());

        let loaded = service.get_trip(trip_id).await.unwrap().unwrap();
        assert_eq!(loaded, edited);
    }

    #[tokio::test]
    async fn test_edit_trip_keeping_own_name() {
        let service = create_service();
        let trip = service
            .create_trip(CreateTrip::new(details("Pyramids", "Egypt"), 10))
            .await
            .unwrap();

        let edited = service
            .edit_trip(
                trip.id().unwrap(),
                EditTrip::new(details("Pyramids", "Sudan"), 10),
            )
            .await
            .unwrap();

        assert_eq!(edited.country(), "Sudan");
    }

    #[tokio::test]
    async fn test_edit_missing_trip() {
        let service = create_service();

        let result = service
            .edit_trip(TripId::new(7), EditTrip::new(details("X", "Egypt"), 1))
            .await;

        assert!(matches!(result, Err(DomainError::TripNotFound(id)) if id == TripId::new(7)));
    }

    #[tokio::test]
    async fn test_edit_below_taken_writes_nothing() {
        let service = create_service();
        let trip = service
            .create_trip(CreateTrip::new(details("Pyramids", "Egypt"), 3))
            .await
            .unwrap();
        let trip_id = trip.id().unwrap();
        service
            .register_for_trip(trip_id, register("a@example.com"))
            .await
            .unwrap();
        service
            .register_for_trip(trip_id, register("b@example.com"))
            .await
            .unwrap();

        let result = service
            .edit_trip(trip_id, EditTrip::new(details("Renamed", "Egypt"), 1))
            .await;

        assert_rule(
            result,
            BusinessRule::SeatsBelowTaken {
                requested: 1,
                taken: 2,
            },
        );
        let loaded = service.get_trip(trip_id).await.unwrap().unwrap();
        assert_eq!(loaded.name(), "Pyramids");
        assert_eq!(loaded.number_of_seats(), 3);
    }

    #[tokio::test]
    async fn test_register_for_trip() {
        let service = create_service();
        let trip = service
            .create_trip(CreateTrip::new(details("Pyramids", "Egypt"), 2))
            .await
            .unwrap();
        let trip_id = trip.id().unwrap();

        let registration = service
            .register_for_trip(trip_id, register("a@example.com"))
            .await
            .unwrap();

        assert!(registration.id().is_some());
        assert_eq!(registration.trip_id(), trip_id);

        let duplicate = service
            .register_for_trip(trip_id, register("a@example.com"))
            .await;
        assert_rule(duplicate, BusinessRule::EmailAlreadyRegistered);

        service
            .register_for_trip(trip_id, register("b@example.com"))
            .await
            .unwrap();

        let full = service
            .register_for_trip(trip_id, register("c@example.com"))
            .await;
        assert_rule(full, BusinessRule::NoSeatsAvailable);

        let registrations = service.registrations(trip_id).await.unwrap();
        let emails: Vec<_> = registrations
            .iter()
            .map(|r| r.email_address().as_str())
            .collect();
        assert_eq!(emails, vec!["a@example.com", "b@example.com"]);
    }

    #[tokio::test]
    async fn test_register_for_missing_trip() {
        let service = create_service();

        let result = service
            .register_for_trip(TripId::new(3), register("a@example.com"))
            .await;

        assert!(matches!(result, Err(DomainError::TripNotFound(_))));
        assert!(matches!(
            service.registrations(TripId::new(3)).await,
            Err(DomainError::TripNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_trip() {
        let service = create_service();
        let trip = service
            .create_trip(CreateTrip::new(details("Pyramids", "Egypt"), 2))
            .await
            .unwrap();
        let trip_id = trip.id().unwrap();
        service
            .register_for_trip(trip_id, register("a@example.com"))
            .await
            .unwrap();

        service.delete_trip(trip_id).await.unwrap();

        assert!(service.get_trip(trip_id).await.unwrap().is_none());
        assert_eq!(service.store().registration_count().await, 0);
        assert!(matches!(
            service.delete_trip(trip_id).await,
            Err(DomainError::TripNotFound(_))
        ));
    }
}
