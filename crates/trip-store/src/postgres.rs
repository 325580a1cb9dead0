use async_trait::async_trait;
use sqlx::{
    PgPool, Postgres, Row, Transaction,
    postgres::{PgPoolOptions, PgRow},
};

use crate::{
    NewRegistration, NewTrip, RegistrationId, RegistrationRecord, Result, StoreError, TripId,
    TripQuery, TripRecord, Version, store::TripStore,
};

const TRIP_COLUMNS: &str =
    "id, name, country, description, start_date, number_of_seats, version";

/// PostgreSQL-backed trip store implementation.
#[derive(Clone)]
pub struct PostgresTripStore {
    pool: PgPool,
}

impl PostgresTripStore {
    /// Creates a new PostgreSQL trip store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool to `database_url` and wraps it in a store.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::info!(max_connections, "Connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_trip(row: PgRow) -> Result<TripRecord> {
        let seats: i32 = row.try_get("number_of_seats")?;

        Ok(TripRecord {
            id: TripId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            country: row.try_get("country")?,
            description: row.try_get("description")?,
            start_date: row.try_get("start_date")?,
            number_of_seats: u32::try_from(seats).map_err(|_| StoreError::OutOfRange {
                column: "number_of_seats",
                value: i64::from(seats),
            })?,
            version: Version::new(row.try_get("version")?),
        })
    }

    fn row_to_registration(row: PgRow) -> Result<RegistrationRecord> {
        Ok(RegistrationRecord {
            id: RegistrationId::new(row.try_get("id")?),
            trip_id: TripId::new(row.try_get("trip_id")?),
            email_address: row.try_get("email_address")?,
        })
    }

    /// Resolves a failed conditional write into the right error.
    async fn version_mismatch(
        tx: &mut Transaction<'_, Postgres>,
        trip_id: TripId,
        expected: Version,
    ) -> StoreError {
        let actual: std::result::Result<Option<i64>, sqlx::Error> =
            sqlx::query_scalar("SELECT version FROM trips WHERE id = $1")
                .bind(trip_id.as_i64())
                .fetch_optional(&mut **tx)
                .await;

        match actual {
            Ok(Some(actual)) => StoreError::ConcurrencyConflict {
                trip_id,
                expected,
                actual: Version::new(actual),
            },
            Ok(None) => StoreError::TripNotFound(trip_id),
            Err(e) => StoreError::Database(e),
        }
    }
}

fn seats_to_column(seats: u32) -> Result<i32> {
    i32::try_from(seats).map_err(|_| StoreError::OutOfRange {
        column: "number_of_seats",
        value: i64::from(seats),
    })
}

/// Maps unique index violations to `UniqueViolation`, everything else to `Database`.
fn map_write_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::UniqueViolation(db_err.constraint().unwrap_or("unknown").to_string());
    }
    StoreError::Database(e)
}

#[async_trait]
impl TripStore for PostgresTripStore {
    async fn insert_trip(&self, trip: NewTrip) -> Result<TripRecord> {
        let seats = seats_to_column(trip.number_of_seats)?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO trips (name, country, description, start_date, number_of_seats, version)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TRIP_COLUMNS}
            "#
        ))
        .bind(&trip.name)
        .bind(&trip.country)
        .bind(&trip.description)
        .bind(trip.start_date)
        .bind(seats)
        .bind(Version::first().as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        let record = Self::row_to_trip(row)?;
        tracing::debug!(trip_id = %record.id, "trip inserted");
        Ok(record)
    }

    async fn get_trip(&self, trip_id: TripId) -> Result<Option<TripRecord>> {
        let row = sqlx::query(&format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = $1"))
            .bind(trip_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_trip).transpose()
    }

    async fn list_trips(&self, query: TripQuery) -> Result<Vec<TripRecord>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {TRIP_COLUMNS}
            FROM trips
            WHERE ($1::TEXT IS NULL OR country = $1)
            ORDER BY id ASC
            "#
        ))
        .bind(query.country)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_trip).collect()
    }

    async fn update_trip(&self, trip: &TripRecord, expected_version: Version) -> Result<Version> {
        let seats = seats_to_column(trip.number_of_seats)?;
        let mut tx = self.pool.begin().await?;

        let new_version: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE trips
            SET name = $2, country = $3, description = $4, start_date = $5,
                number_of_seats = $6, version = version + 1
            WHERE id = $1 AND version = $7
            RETURNING version
            "#,
        )
        .bind(trip.id.as_i64())
        .bind(&trip.name)
        .bind(&trip.country)
        .bind(&trip.description)
        .bind(trip.start_date)
        .bind(seats)
        .bind(expected_version.as_i64())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_write_error)?;

        let Some(new_version) = new_version else {
            return Err(Self::version_mismatch(&mut tx, trip.id, expected_version).await);
        };

        tx.commit().await?;
        Ok(Version::new(new_version))
    }

    async fn delete_trip(&self, trip_id: TripId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(trip_id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_registration(
        &self,
        registration: NewRegistration,
        expected_trip_version: Version,
    ) -> Result<RegistrationRecord> {
        let trip_id = registration.trip_id;
        let mut tx = self.pool.begin().await?;

        // Claim the trip version first so concurrent registrations serialize on the row
        let bumped: Option<i64> = sqlx::query_scalar(
            "UPDATE trips SET version = version + 1 WHERE id = $1 AND version = $2 RETURNING version",
        )
        .bind(trip_id.as_i64())
        .bind(expected_trip_version.as_i64())
        .fetch_optional(&mut *tx)
        .await?;

        if bumped.is_none() {
            return Err(Self::version_mismatch(&mut tx, trip_id, expected_trip_version).await);
        }

        let row = sqlx::query(
            r#"
            INSERT INTO trip_registrations (trip_id, email_address)
            VALUES ($1, $2)
            RETURNING id, trip_id, email_address
            "#,
        )
        .bind(trip_id.as_i64())
        .bind(&registration.email_address)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Self::row_to_registration(row)
    }

    async fn registrations_for_trip(&self, trip_id: TripId) -> Result<Vec<RegistrationRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, trip_id, email_address
            FROM trip_registrations
            WHERE trip_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(trip_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_registration).collect()
    }

    async fn count_registrations(&self, trip_id: TripId) -> Result<u32> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM trip_registrations WHERE trip_id = $1")
                .bind(trip_id.as_i64())
                .fetch_one(&self.pool)
                .await?;

        u32::try_from(count).map_err(|_| StoreError::OutOfRange {
            column: "registrations",
            value: count,
        })
    }

    async fn registration_exists(&self, trip_id: TripId, email_address: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM trip_registrations WHERE trip_id = $1 AND email_address = $2)",
        )
        .bind(trip_id.as_i64())
        .bind(email_address)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn name_exists(&self, name: &str, excluding: Option<TripId>) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM trips WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(excluding.map(|id| id.as_i64()))
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
