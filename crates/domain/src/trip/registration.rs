//! Trip registration entity.

use common::{RegistrationId, TripId};
use trip_store::{NewRegistration, RegistrationRecord};

use super::{EmailAddress, TripError};

/// One seat reserved on a trip for an email address.
///
/// Only [`Trip::create_registration`](super::Trip::create_registration)
/// creates new registrations. The owning trip is referenced by id and is
/// never navigated back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRegistration {
    id: Option<RegistrationId>,
    trip_id: TripId,
    email_address: EmailAddress,
}

impl TripRegistration {
    pub(crate) fn new(
        trip_id: Option<TripId>,
        email_address: EmailAddress,
    ) -> Result<Self, TripError> {
        let trip_id = trip_id.ok_or(TripError::InvalidArgument { field: "trip_id" })?;

        if email_address.as_str().is_empty() {
            return Err(TripError::InvalidArgument {
                field: "email_address",
            });
        }

        Ok(Self {
            id: None,
            trip_id,
            email_address,
        })
    }

    /// Rebuilds a registration from its stored row.
    pub fn from_record(record: RegistrationRecord) -> Result<Self, TripError> {
        Ok(Self {
            id: Some(record.id),
            trip_id: record.trip_id,
            email_address: EmailAddress::parse(record.email_address)?,
        })
    }

    /// Returns the store-assigned id, or None if not yet persisted.
    pub fn id(&self) -> Option<RegistrationId> {
        self.id
    }

    pub fn trip_id(&self) -> TripId {
        self.trip_id
    }

    pub fn email_address(&self) -> &EmailAddress {
        &self.email_address
    }

    /// Returns the values the store needs to insert this registration.
    pub fn to_new_registration(&self) -> NewRegistration {
        NewRegistration {
            trip_id: self.trip_id,
            email_address: self.email_address.as_str().to_string(),
        }
    }
}
