//! Train repository for database operations

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{AppError, AppResult, map_unique_violation};
use crate::models::{NewTrain, Train};

/// Train repository
#[derive(Clone)]
pub struct TrainRepository {
    pool: SqlitePool,
}

impl TrainRepository {
    /// Create a new train repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a train row, returning the stored entity with its id
    pub async fn insert(&self, new_train: &NewTrain) -> AppResult<Train> {
        info!(
            "Adding train {} departing {}",
            new_train.train_number, new_train.departure_date
        );

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO trains (train_number, train_name, departure_date, origin, destination)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&new_train.train_number)
        .bind(&new_train.train_name)
        .bind(new_train.departure_date)
        .bind(&new_train.origin)
        .bind(&new_train.destination)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, AppError::DuplicateTrain))?;

        Ok(Train {
            id,
            train_number: new_train.train_number.clone(),
            train_name: new_train.train_name.clone(),
            departure_date: new_train.departure_date,
            origin: new_train.origin.clone(),
            destination: new_train.destination.clone(),
        })
    }

    /// Find the train a booking against a bare train number resolves to.
    ///
    /// Bookings match on train_number only; when several departures share a
    /// number the earliest departure wins.
    pub async fn resolve_by_number(&self, train_number: &str) -> AppResult<Option<Train>> {
        let train = sqlx::query_as::<_, Train>(
            r#"
            SELECT id, train_number, train_name, departure_date, origin, destination
            FROM trains
            WHERE train_number = ?
            ORDER BY departure_date ASC
            LIMIT 1
            "#,
        )
        .bind(train_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(train)
    }

    /// Find the train matching both number and departure date exactly
    pub async fn find_exact(
        &self,
        train_number: &str,
        departure_date: NaiveDate,
    ) -> AppResult<Option<Train>> {
        let train = sqlx::query_as::<_, Train>(
            r#"
            SELECT id, train_number, train_name, departure_date, origin, destination
            FROM trains
            WHERE train_number = ? AND departure_date = ?
            "#,
        )
        .bind(train_number)
        .bind(departure_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(train)
    }

    /// Delete a train row by id
    pub async fn delete(&self, train_id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM trains WHERE id = ?")
            .bind(train_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// All departures sharing a train number
    pub async fn search_by_number(&self, train_number: &str) -> AppResult<Vec<Train>> {
        let trains = sqlx::query_as::<_, Train>(
            r#"
            SELECT id, train_number, train_name, departure_date, origin, destination
            FROM trains
            WHERE train_number = ?
            ORDER BY departure_date ASC
            "#,
        )
        .bind(train_number)
        .fetch_all(&self.pool)
        .await?;

        Ok(trains)
    }

    /// Trains running a route, optionally filtered to one departure date
    pub async fn search_by_route(
        &self,
        origin: &str,
        destination: &str,
        departure_date: Option<NaiveDate>,
    ) -> AppResult<Vec<Train>> {
        let trains = match departure_date {
            Some(date) => {
                sqlx::query_as::<_, Train>(
                    r#"
                    SELECT id, train_number, train_name, departure_date, origin, destination
                    FROM trains
                    WHERE origin = ? AND destination = ? AND departure_date = ?
                    ORDER BY departure_date ASC, train_number ASC
                    "#,
                )
                .bind(origin)
                .bind(destination)
                .bind(date)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Train>(
                    r#"
                    SELECT id, train_number, train_name, departure_date, origin, destination
                    FROM trains
                    WHERE origin = ? AND destination = ?
                    ORDER BY departure_date ASC, train_number ASC
                    "#,
                )
                .bind(origin)
                .bind(destination)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(trains)
    }

    /// All trains ordered by (departure_date, train_number) ascending
    pub async fn list_all(&self) -> AppResult<Vec<Train>> {
        let trains = sqlx::query_as::<_, Train>(
            r#"
            SELECT id, train_number, train_name, departure_date, origin, destination
            FROM trains
            ORDER BY departure_date ASC, train_number ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(trains)
    }
}
