//! Trip aggregate implementation.

use chrono::{DateTime, Utc};
use common::TripId;
use trip_store::{NewTrip, TripRecord, Version};

use crate::error::DomainError;

use super::{
    BusinessRule, ConstraintsChecker, EmailAddress, TripDetails, TripError, TripRegistration,
};

/// Trip aggregate root.
///
/// All changes to a trip go through the methods below, each of which asks
/// the injected [`ConstraintsChecker`] for the facts it needs before
/// touching any field. A failed check leaves the trip unchanged.
///
/// Invariant: `number_of_seats` is never below the number of registrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    /// Store-assigned id; None until the trip is first persisted.
    id: Option<TripId>,

    name: String,
    country: String,
    description: String,
    start_date: DateTime<Utc>,
    number_of_seats: u32,

    /// Version of the stored row this instance was loaded from.
    version: Version,
}

// Query methods
impl Trip {
    pub fn id(&self) -> Option<TripId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn number_of_seats(&self) -> u32 {
        self.number_of_seats
    }

    /// Returns the version of the stored row, or `Version::initial()` if unsaved.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns true if the trip has been stored.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

// Command methods
impl Trip {
    /// Creates a new, not yet persisted trip.
    ///
    /// Fails with `InvalidArgument` if name, country or description is empty
    /// and with `NameNotUnique` if another trip already has the name. The
    /// seat count is not range-checked here.
    pub async fn create_new<C: ConstraintsChecker + ?Sized>(
        details: TripDetails,
        number_of_seats: u32,
        checker: &C,
    ) -> Result<Self, DomainError> {
        details.validate()?;

        if !checker.is_name_unique(&details.name, None).await? {
            return Err(TripError::from(BusinessRule::NameNotUnique).into());
        }

        Ok(Self::assemble(None, details, number_of_seats, Version::initial()))
    }

    /// Replaces name, country, description and start date.
    ///
    /// The trip's own current name does not count as a clash.
    pub async fn edit_details<C: ConstraintsChecker + ?Sized>(
        &mut self,
        details: TripDetails,
        checker: &C,
    ) -> Result<(), DomainError> {
        details.validate()?;

        if !checker.is_name_unique(&details.name, self.id).await? {
            return Err(TripError::from(BusinessRule::NameNotUnique).into());
        }

        let TripDetails {
            name,
            country,
            description,
            start_date,
        } = details;
        self.name = name;
        self.country = country;
        self.description = description;
        self.start_date = start_date;

        Ok(())
    }

    /// Changes the seat count.
    ///
    /// Fails if the new count is below the seats already taken; equal is
    /// allowed. An unsaved trip has no registrations, so nothing is queried.
    pub async fn update_number_of_seats<C: ConstraintsChecker + ?Sized>(
        &mut self,
        new_number_of_seats: u32,
        checker: &C,
    ) -> Result<(), DomainError> {
        let taken = match self.id {
            Some(id) => checker.seats_taken(id).await?,
            None => 0,
        };

        if new_number_of_seats < taken {
            return Err(TripError::from(BusinessRule::SeatsBelowTaken {
                requested: new_number_of_seats,
                taken,
            })
            .into());
        }

        self.number_of_seats = new_number_of_seats;
        Ok(())
    }

    /// Creates a registration for `email_address` on this trip.
    ///
    /// Email uniqueness is checked before seat availability, and the seat
    /// query is skipped when the email check already failed. The trip
    /// itself is not modified and nothing is persisted.
    pub async fn create_registration<C: ConstraintsChecker + ?Sized>(
        &self,
        email_address: EmailAddress,
        checker: &C,
    ) -> Result<TripRegistration, DomainError> {
        let trip_id = self
            .id
            .ok_or(TripError::InvalidArgument { field: "trip_id" })?;

        if !checker
            .is_reservation_email_unique(trip_id, email_address.as_str())
            .await?
        {
            return Err(TripError::from(BusinessRule::EmailAlreadyRegistered).into());
        }

        let taken = checker.seats_taken(trip_id).await?;
        if taken >= self.number_of_seats {
            return Err(TripError::from(BusinessRule::NoSeatsAvailable).into());
        }

        Ok(TripRegistration::new(self.id, email_address)?)
    }
}

// Persistence mapping
impl Trip {
    fn assemble(
        id: Option<TripId>,
        details: TripDetails,
        number_of_seats: u32,
        version: Version,
    ) -> Self {
        Self {
            id,
            name: details.name,
            country: details.country,
            description: details.description,
            start_date: details.start_date,
            number_of_seats,
            version,
        }
    }

    /// Rebuilds a trip from its stored row.
    pub fn from_record(record: TripRecord) -> Self {
        Self {
            id: Some(record.id),
            name: record.name,
            country: record.country,
            description: record.description,
            start_date: record.start_date,
            number_of_seats: record.number_of_seats,
            version: record.version,
        }
    }

    /// Returns the values the store needs to insert this trip.
    pub fn to_new_trip(&self) -> NewTrip {
        NewTrip {
            name: self.name.clone(),
            country: self.country.clone(),
            description: self.description.clone(),
            start_date: self.start_date,
            number_of_seats: self.number_of_seats,
        }
    }

    /// Returns the row to write back for a persisted trip.
    pub fn to_record(&self) -> Result<TripRecord, TripError> {
        let id = self
            .id
            .ok_or(TripError::InvalidArgument { field: "trip_id" })?;

        Ok(TripRecord {
            id,
            name: self.name.clone(),
            country: self.country.clone(),
            description: self.description.clone(),
            start_date: self.start_date,
            number_of_seats: self.number_of_seats,
            version: self.version,
        })
    }
}
