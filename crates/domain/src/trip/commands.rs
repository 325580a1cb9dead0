//! Trip commands.

use super::{EmailAddress, TripDetails};

/// Command to create a new trip.
#[derive(Debug, Clone)]
pub struct CreateTrip {
    /// Name, country, description and start date.
    pub details: TripDetails,

    /// Seats offered on the trip.
    pub number_of_seats: u32,
}

impl CreateTrip {
    /// Creates a new CreateTrip command.
    pub fn new(details: TripDetails, number_of_seats: u32) -> Self {
        Self {
            details,
            number_of_seats,
        }
    }
}

/// Command to replace the details and seat count of an existing trip.
#[derive(Debug, Clone)]
pub struct EditTrip {
    pub details: TripDetails,
    pub number_of_seats: u32,
}

impl EditTrip {
    /// Creates a new EditTrip command.
    pub fn new(details: TripDetails, number_of_seats: u32) -> Self {
        Self {
            details,
            number_of_seats,
        }
    }
}

/// Command to register an email address for a trip.
#[derive(Debug, Clone)]
pub struct RegisterForTrip {
    pub email_address: EmailAddress,
}

impl RegisterForTrip {
    /// Creates a new RegisterForTrip command.
    pub fn new(email_address: EmailAddress) -> Self {
        Self { email_address }
    }
}
