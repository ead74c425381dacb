//! Train registry: train lifecycle and lookups
//!
//! Adding a train spawns its seat inventory; deleting a train destroys it.
//! The registry is the only writer of the trains table.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{NewTrain, Train};
use crate::repositories::{SeatRepository, TrainRepository};
use crate::validation;

/// Train registry
#[derive(Clone)]
pub struct TrainRegistry {
    trains: TrainRepository,
    seats: SeatRepository,
}

impl TrainRegistry {
    /// Create a new train registry
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            trains: TrainRepository::new(pool.clone()),
            seats: SeatRepository::new(pool),
        }
    }

    /// Register a train and initialize its seat inventory
    pub async fn add(&self, new_train: &NewTrain) -> AppResult<Train> {
        validation::validate_train_number(&new_train.train_number)
            .map_err(AppError::InvalidInput)?;
        if new_train.train_name.is_empty()
            || new_train.origin.is_empty()
            || new_train.destination.is_empty()
        {
            return Err(AppError::InvalidInput(
                "Train name, origin, and destination are required".to_string(),
            ));
        }

        let train = self.trains.insert(new_train).await?;
        self.seats.initialize(train.id).await?;

        Ok(train)
    }

    /// Delete the train matching both number and departure date, destroying
    /// its seat inventory
    pub async fn delete(&self, train_number: &str, departure_date: NaiveDate) -> AppResult<Train> {
        let Some(train) = self.trains.find_exact(train_number, departure_date).await? else {
            return Err(AppError::NotFound(format!(
                "No such train {} on {}",
                train_number, departure_date
            )));
        };

        self.seats.destroy(train.id).await?;
        self.trains.delete(train.id).await?;

        info!("Deleted train {} on {}", train_number, departure_date);
        Ok(train)
    }

    /// All departures sharing a train number
    pub async fn search_by_number(&self, train_number: &str) -> AppResult<Vec<Train>> {
        self.trains.search_by_number(train_number).await
    }

    /// Trains on a route, optionally on an exact departure date
    pub async fn search_by_route(
        &self,
        origin: &str,
        destination: &str,
        departure_date: Option<NaiveDate>,
    ) -> AppResult<Vec<Train>> {
        self.trains
            .search_by_route(origin, destination, departure_date)
            .await
    }

    /// All trains ordered by (departure_date, train_number)
    pub async fn list_all(&self) -> AppResult<Vec<Train>> {
        self.trains.list_all().await
    }

    /// Seat listing for a train resolved by number
    pub async fn seats_for(&self, train_number: &str) -> AppResult<Vec<crate::models::Seat>> {
        let Some(train) = self.trains.resolve_by_number(train_number).await? else {
            return Err(AppError::TrainNotFound);
        };

        self.seats.list(train.id).await
    }
}
