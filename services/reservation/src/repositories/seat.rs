//! Seat inventory repository
//!
//! Every train owns a fixed inventory of fifty seats, created en masse when
//! the train is added and destroyed en masse when it is deleted. Individual
//! seats are only ever mutated, never inserted or removed.

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::AppResult;
use crate::models::seat::SEATS_PER_TRAIN;
use crate::models::{Passenger, Seat, SeatType};

/// Seat inventory repository
#[derive(Clone)]
pub struct SeatRepository {
    pool: SqlitePool,
}

impl SeatRepository {
    /// Create a new seat repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the fifty-seat inventory for a train.
    ///
    /// Seat types follow the mod-10 layout rule. No-op when seats already
    /// exist for the train.
    pub async fn initialize(&self, train_id: i64) -> AppResult<()> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM seats WHERE train_id = ?")
            .bind(train_id)
            .fetch_one(&self.pool)
            .await?;

        if existing > 0 {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for seat_number in 1..=SEATS_PER_TRAIN {
            sqlx::query(
                r#"
                INSERT INTO seats (train_id, seat_number, seat_type, booked,
                                   passenger_name, passenger_age, passenger_gender)
                VALUES (?, ?, ?, 0, '', NULL, '')
                "#,
            )
            .bind(train_id)
            .bind(seat_number)
            .bind(SeatType::for_seat(seat_number))
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!("Initialized {} seats for train {}", SEATS_PER_TRAIN, train_id);
        Ok(())
    }

    /// Lowest-numbered unbooked seat of the requested type, if any
    pub async fn find_next_available(
        &self,
        train_id: i64,
        seat_type: SeatType,
    ) -> AppResult<Option<i64>> {
        let seat_number: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT seat_number FROM seats
            WHERE train_id = ? AND booked = 0 AND seat_type = ?
            ORDER BY seat_number ASC
            LIMIT 1
            "#,
        )
        .bind(train_id)
        .bind(seat_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(seat_number)
    }

    /// Mark a seat booked, recording the passenger and the requested type.
    ///
    /// The seat's type is overwritten to the requested one, mirroring the
    /// long-standing booking behavior. Silent no-op when the seat number does
    /// not exist.
    pub async fn assign(
        &self,
        train_id: i64,
        seat_number: i64,
        seat_type: SeatType,
        passenger: &Passenger,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE seats
            SET booked = 1, seat_type = ?, passenger_name = ?,
                passenger_age = ?, passenger_gender = ?
            WHERE train_id = ? AND seat_number = ?
            "#,
        )
        .bind(seat_type)
        .bind(&passenger.name)
        .bind(passenger.age)
        .bind(&passenger.gender)
        .bind(train_id)
        .bind(seat_number)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Free a seat, clearing the passenger fields. Idempotent.
    pub async fn release(&self, train_id: i64, seat_number: i64) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE seats
            SET booked = 0, passenger_name = '', passenger_age = NULL, passenger_gender = ''
            WHERE train_id = ? AND seat_number = ?
            "#,
        )
        .bind(train_id)
        .bind(seat_number)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All seats of a train ordered by seat number ascending.
    ///
    /// A train without seat rows yields an empty list with a warning; the
    /// inventory should exist for every train row.
    pub async fn list(&self, train_id: i64) -> AppResult<Vec<Seat>> {
        let seats = sqlx::query_as::<_, Seat>(
            r#"
            SELECT train_id, seat_number, seat_type, booked,
                   passenger_name, passenger_age, passenger_gender
            FROM seats
            WHERE train_id = ?
            ORDER BY seat_number ASC
            "#,
        )
        .bind(train_id)
        .fetch_all(&self.pool)
        .await?;

        if seats.is_empty() {
            warn!("Seat inventory missing for train {}", train_id);
        }

        Ok(seats)
    }

    /// Fetch a single seat
    pub async fn find(&self, train_id: i64, seat_number: i64) -> AppResult<Option<Seat>> {
        let seat = sqlx::query_as::<_, Seat>(
            r#"
            SELECT train_id, seat_number, seat_type, booked,
                   passenger_name, passenger_age, passenger_gender
            FROM seats
            WHERE train_id = ? AND seat_number = ?
            "#,
        )
        .bind(train_id)
        .bind(seat_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(seat)
    }

    /// Remove a train's entire inventory
    pub async fn destroy(&self, train_id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM seats WHERE train_id = ?")
            .bind(train_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
