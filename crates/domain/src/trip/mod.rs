//! Trip aggregate and related types.

mod aggregate;
mod commands;
mod constraints;
mod registration;
mod service;
mod value_objects;

pub use aggregate::Trip;
pub use commands::{CreateTrip, EditTrip, RegisterForTrip};
pub use constraints::{ConstraintsChecker, StoreConstraintsChecker};
#[cfg(test)]
pub(crate) use constraints::MockConstraintsChecker;
pub use registration::TripRegistration;
pub use service::TripService;
pub use value_objects::{EmailAddress, TripDetails};

use thiserror::Error;

/// A booking rule that rejected an otherwise well-formed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusinessRule {
    /// Another trip already uses the requested name.
    #[error("The trip name must be unique")]
    NameNotUnique,

    /// The email address is already registered for this trip.
    #[error("A single email can be registered for the trip only once")]
    EmailAlreadyRegistered,

    /// Every seat of the trip is taken.
    #[error("Can't register more users for this trip")]
    NoSeatsAvailable,

    /// The requested seat count is below the number of registrations.
    #[error("Can't reduce seats number below number of seats taken already")]
    SeatsBelowTaken { requested: u32, taken: u32 },
}

/// Errors that can occur during trip operations.
#[derive(Debug, Error)]
pub enum TripError {
    /// A required argument was missing or empty.
    #[error("Invalid argument: {field} must not be empty")]
    InvalidArgument { field: &'static str },

    /// The value is not shaped like an email address.
    #[error("Invalid email address: {0:?}")]
    InvalidEmail(String),

    /// A booking rule was violated.
    #[error("{0}")]
    BusinessRuleViolation(BusinessRule),
}

impl From<BusinessRule> for TripError {
    fn from(rule: BusinessRule) -> Self {
        TripError::BusinessRuleViolation(rule)
    }
}
