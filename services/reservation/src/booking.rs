//! Booking engine: seat allocation and cancellation
//!
//! Bookings address a train by number alone. When several departures share a
//! number the earliest departure is used; requiring the date here would break
//! the established booking flow, so the ambiguity is resolved by ordering
//! instead.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{Passenger, SeatType};
use crate::repositories::{SeatRepository, TrainRepository};

/// A confirmed booking
#[derive(Debug, Clone)]
pub struct Booking {
    pub train_number: String,
    pub seat_number: i64,
    pub seat_type: SeatType,
    pub passenger: Passenger,
}

/// Booking engine
#[derive(Clone)]
pub struct BookingEngine {
    trains: TrainRepository,
    seats: SeatRepository,
}

impl BookingEngine {
    /// Create a new booking engine
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            trains: TrainRepository::new(pool.clone()),
            seats: SeatRepository::new(pool),
        }
    }

    /// Allocate the next available seat of the requested type.
    ///
    /// Mutates exactly one seat row.
    pub async fn book(
        &self,
        train_number: &str,
        passenger: Passenger,
        seat_type: SeatType,
    ) -> AppResult<Booking> {
        if passenger.name.is_empty() {
            return Err(AppError::InvalidInput(
                "Passenger name is required".to_string(),
            ));
        }

        let Some(train) = self.trains.resolve_by_number(train_number).await? else {
            return Err(AppError::TrainNotFound);
        };

        let Some(seat_number) = self.seats.find_next_available(train.id, seat_type).await? else {
            return Err(AppError::NoSeatAvailable);
        };

        self.seats
            .assign(train.id, seat_number, seat_type, &passenger)
            .await?;

        info!(
            "Booked seat {} ({:?}) on train {} for {}",
            seat_number, seat_type, train_number, passenger.name
        );

        Ok(Booking {
            train_number: train_number.to_string(),
            seat_number,
            seat_type,
            passenger,
        })
    }

    /// Free a seat. Cancelling a seat that was never booked is a no-op
    /// success.
    pub async fn cancel(&self, train_number: &str, seat_number: i64) -> AppResult<()> {
        let Some(train) = self.trains.resolve_by_number(train_number).await? else {
            return Err(AppError::TrainNotFound);
        };

        self.seats.release(train.id, seat_number).await?;

        info!("Released seat {} on train {}", seat_number, train_number);
        Ok(())
    }
}
