//! Train model and related functionality

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Train entity
///
/// A train is identified by its (train_number, departure_date) pair; the
/// numeric id keys the seat inventory owned by the train.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Train {
    pub id: i64,
    pub train_number: String,
    pub train_name: String,
    pub departure_date: NaiveDate,
    pub origin: String,
    pub destination: String,
}

/// New train creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrain {
    pub train_number: String,
    pub train_name: String,
    pub departure_date: NaiveDate,
    pub origin: String,
    pub destination: String,
}
