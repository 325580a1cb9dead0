//! Domain layer for the trip booking service.
//!
//! This crate provides:
//! - the `Trip` aggregate and its `TripRegistration` child entity
//! - the `ConstraintsChecker` port the aggregate queries for uniqueness and capacity
//! - `TripService`, which loads, validates and persists trips through a `TripStore`

pub mod error;
pub mod trip;

pub use error::DomainError;
pub use trip::{
    BusinessRule, ConstraintsChecker, CreateTrip, EditTrip, EmailAddress, RegisterForTrip,
    StoreConstraintsChecker, Trip, TripDetails, TripError, TripRegistration, TripService,
};
