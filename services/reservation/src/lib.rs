//! Reservation service library
//!
//! Train-ticket reservation core: signup/verification/login, train
//! registry, and the seat booking engine, all over a single-connection
//! SQLite store.

pub mod auth;
pub mod booking;
pub mod error;
pub mod mailer;
pub mod middleware;
pub mod models;
pub mod password;
pub mod registry;
pub mod repositories;
pub mod routes;
pub mod schema;
pub mod validation;

use sqlx::SqlitePool;

use crate::{auth::AuthService, booking::BookingEngine, mailer::Mailer, registry::TrainRegistry};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub auth: AuthService,
    pub registry: TrainRegistry,
    pub booking: BookingEngine,
}

impl AppState {
    /// Wire the services over one pool and mail channel
    pub fn new(pool: SqlitePool, mailer: Mailer) -> Self {
        Self {
            auth: AuthService::new(pool.clone(), mailer),
            registry: TrainRegistry::new(pool.clone()),
            booking: BookingEngine::new(pool.clone()),
            db_pool: pool,
        }
    }
}
