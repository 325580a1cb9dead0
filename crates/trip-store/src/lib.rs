//! Persistence layer for trips and their registrations.
//!
//! The [`TripStore`] trait is the only surface the domain sees. Two
//! implementations ship with the crate: [`InMemoryTripStore`] for tests and
//! database-less runs, and [`PostgresTripStore`] backed by `sqlx`.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod record;
pub mod store;

pub use common::{RegistrationId, TripId};
pub use error::{Result, StoreError};
pub use memory::InMemoryTripStore;
pub use postgres::PostgresTripStore;
pub use query::TripQuery;
pub use record::{NewRegistration, NewTrip, RegistrationRecord, TripRecord, Version};
pub use store::{TripStore, TripStoreExt};
