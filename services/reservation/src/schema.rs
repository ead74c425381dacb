//! Schema setup for the reservation service
//!
//! All seat rows live in a single `seats` table keyed by
//! (train_id, seat_number), with `train_id` owned by the `trains` table.

use common::error::{DatabaseError, DatabaseResult};
use sqlx::SqlitePool;
use tracing::info;

const CREATE_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        username TEXT PRIMARY KEY,
        password_hash TEXT NOT NULL,
        email TEXT NOT NULL,
        email_verified INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS employees (
        employee_id TEXT PRIMARY KEY,
        password_hash TEXT NOT NULL,
        designation TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS trains (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        train_number TEXT NOT NULL,
        train_name TEXT NOT NULL,
        departure_date TEXT NOT NULL,
        origin TEXT NOT NULL,
        destination TEXT NOT NULL,
        UNIQUE (train_number, departure_date)
    )",
    "CREATE TABLE IF NOT EXISTS seats (
        train_id INTEGER NOT NULL REFERENCES trains(id),
        seat_number INTEGER NOT NULL,
        seat_type TEXT NOT NULL,
        booked INTEGER NOT NULL DEFAULT 0,
        passenger_name TEXT NOT NULL DEFAULT '',
        passenger_age INTEGER,
        passenger_gender TEXT NOT NULL DEFAULT '',
        PRIMARY KEY (train_id, seat_number)
    )",
    "CREATE TABLE IF NOT EXISTS email_codes (
        username TEXT NOT NULL,
        code TEXT NOT NULL,
        purpose TEXT NOT NULL,
        expiry_ts INTEGER NOT NULL
    )",
];

/// Create the tables when they do not exist yet
pub async fn ensure_schema(pool: &SqlitePool) -> DatabaseResult<()> {
    for statement in CREATE_TABLES {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(DatabaseError::Schema)?;
    }

    info!("Database schema ready");
    Ok(())
}
