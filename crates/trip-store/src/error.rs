use thiserror::Error;

use crate::{TripId, Version};

/// Errors that can occur when interacting with the trip store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The trip changed between being loaded and being written back.
    #[error(
        "Concurrency conflict for trip {trip_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        trip_id: TripId,
        expected: Version,
        actual: Version,
    },

    /// The trip does not exist in the store.
    #[error("Trip not found: {0}")]
    TripNotFound(TripId),

    /// A unique index rejected the write.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A stored or supplied value does not fit the column type.
    #[error("Value out of range for {column}: {value}")]
    OutOfRange { column: &'static str, value: i64 },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for trip store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
