//! Domain error types.

use common::TripId;
use thiserror::Error;
use trip_store::StoreError;

use crate::trip::TripError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the trip store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A trip rule or argument check failed.
    #[error("{0}")]
    Trip(#[from] TripError),

    /// No trip exists with the given id.
    #[error("Trip not found: {0}")]
    TripNotFound(TripId),
}

impl DomainError {
    /// Returns true if the error is a business rule violation.
    pub fn is_rule_violation(&self) -> bool {
        matches!(self, DomainError::Trip(TripError::BusinessRuleViolation(_)))
    }
}
