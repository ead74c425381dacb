//! Middleware gating the service on first-run admin bootstrap

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::{AppState, error::AppError};

/// Refuse everything until the first Admin account exists.
///
/// Layered over every route except `/health` and `POST /setup/admin`.
pub async fn bootstrap_guard(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match state.auth.admin_exists().await {
        Ok(true) => next.run(req).await,
        Ok(false) => AppError::SetupRequired.into_response(),
        Err(e) => {
            error!("Failed to check admin bootstrap state: {}", e);
            e.into_response()
        }
    }
}
