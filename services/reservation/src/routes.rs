//! Reservation service routes
//!
//! The HTTP surface is the Presentation Layer boundary: handlers accept
//! validated primitive inputs and answer with a message (success) or an
//! error (failure) plus a status code.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AppState,
    error::{AppError, AppResult},
    middleware::bootstrap_guard,
    models::{NewTrain, Passenger, Seat, SeatType},
};

/// Request for account signup
#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Response carrying an issued verification code outcome
#[derive(Serialize)]
pub struct CodeIssuedResponse {
    pub username: String,
    pub message: String,
    /// Present only when no mail could be sent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_code: Option<String>,
}

/// Request for email verification
#[derive(Deserialize)]
pub struct VerifyEmailRequest {
    pub username: String,
    pub code: String,
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Response for user login
#[derive(Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub role: String,
    pub message: String,
}

/// Request for a password reset code
#[derive(Deserialize)]
pub struct ResetRequest {
    pub identifier: String,
}

/// Request completing a password reset
#[derive(Deserialize)]
pub struct ResetConfirmRequest {
    pub identifier: String,
    pub code: String,
    pub new_password: String,
}

/// Request creating an admin account
#[derive(Deserialize)]
pub struct CreateAdminRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Request adding a train
#[derive(Deserialize)]
pub struct AddTrainRequest {
    pub train_number: String,
    pub train_name: String,
    pub departure_date: NaiveDate,
    pub origin: String,
    pub destination: String,
}

/// Request deleting a train
#[derive(Deserialize)]
pub struct DeleteTrainRequest {
    pub train_number: String,
    pub departure_date: NaiveDate,
}

/// Query for train search
#[derive(Deserialize)]
pub struct TrainSearchQuery {
    pub number: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Request booking a seat
#[derive(Deserialize)]
pub struct BookingRequest {
    pub train_number: String,
    pub passenger_name: String,
    pub passenger_age: i64,
    pub passenger_gender: String,
    pub seat_type: SeatType,
}

/// Response for a confirmed booking
#[derive(Serialize)]
pub struct BookingResponse {
    pub train_number: String,
    pub seat_number: i64,
    pub seat_type: SeatType,
    pub message: String,
}

/// Request cancelling a booking
#[derive(Deserialize)]
pub struct CancelRequest {
    pub train_number: String,
    pub seat_number: i64,
}

/// Seat row for display, with booked rendered as Yes/No
#[derive(Serialize)]
pub struct SeatRow {
    pub seat_number: i64,
    pub seat_type: SeatType,
    pub booked: &'static str,
    pub passenger_name: String,
    pub passenger_age: Option<i64>,
    pub passenger_gender: String,
}

impl From<Seat> for SeatRow {
    fn from(seat: Seat) -> Self {
        SeatRow {
            seat_number: seat.seat_number,
            seat_type: seat.seat_type,
            booked: if seat.booked { "Yes" } else { "No" },
            passenger_name: seat.passenger_name,
            passenger_age: seat.passenger_age,
            passenger_gender: seat.passenger_gender,
        }
    }
}

/// Create the router for the reservation service
pub fn create_router(state: AppState) -> Router {
    let guarded_routes = Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/verify-email", post(verify_email))
        .route("/auth/login", post(login))
        .route("/auth/password-reset/request", post(request_password_reset))
        .route("/auth/password-reset/confirm", post(confirm_password_reset))
        .route("/admin/admins", post(create_admin))
        .route(
            "/trains",
            post(add_train).get(list_trains).delete(delete_train),
        )
        .route("/trains/search", get(search_trains))
        .route("/trains/:number/seats", get(list_seats))
        .route("/bookings", post(book))
        .route("/bookings/cancel", post(cancel))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            bootstrap_guard,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/setup/admin", post(setup_admin))
        .merge(guarded_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "reservation-service"
    }))
}

/// First-run admin bootstrap; refused once an admin exists
pub async fn setup_admin(
    State(state): State<AppState>,
    Json(payload): Json<CreateAdminRequest>,
) -> AppResult<impl IntoResponse> {
    if state.auth.admin_exists().await? {
        return Err(AppError::InvalidInput(
            "An admin account already exists".to_string(),
        ));
    }

    state
        .auth
        .create_admin(&payload.username, &payload.password, &payload.email)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("Admin account '{}' created. Please log in.", payload.username)
        })),
    ))
}

/// Create a further admin account
pub async fn create_admin(
    State(state): State<AppState>,
    Json(payload): Json<CreateAdminRequest>,
) -> AppResult<impl IntoResponse> {
    state
        .auth
        .create_admin(&payload.username, &payload.password, &payload.email)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("Admin '{}' created", payload.username)
        })),
    ))
}

/// Account signup endpoint
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = state
        .auth
        .sign_up(&payload.username, &payload.password, &payload.email)
        .await?;

    let message = match outcome.dev_code {
        Some(_) => "Account created. Verification code returned directly (no mail channel)",
        None => "Account created. Verification code sent to email",
    };

    Ok((
        StatusCode::CREATED,
        Json(CodeIssuedResponse {
            username: outcome.username,
            message: message.to_string(),
            dev_code: outcome.dev_code,
        }),
    ))
}

/// Email verification endpoint
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> AppResult<impl IntoResponse> {
    state
        .auth
        .verify_email(&payload.username, &payload.code)
        .await?;

    Ok(Json(json!({
        "message": "Email verified. You can now log in"
    })))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = state
        .auth
        .log_in(&payload.identifier, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        username: outcome.username,
        role: outcome.role.as_str().to_string(),
        message: "Logged in successfully".to_string(),
    }))
}

/// Password reset code request endpoint
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(payload): Json<ResetRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.auth.request_password_reset(&payload.identifier).await?;

    let message = match outcome.dev_code {
        Some(_) => "Password reset code returned directly (no mail channel)",
        None => "Password reset code sent to email",
    };

    Ok(Json(CodeIssuedResponse {
        username: outcome.username,
        message: message.to_string(),
        dev_code: outcome.dev_code,
    }))
}

/// Password reset confirmation endpoint
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(payload): Json<ResetConfirmRequest>,
) -> AppResult<impl IntoResponse> {
    state
        .auth
        .reset_password(&payload.identifier, &payload.code, &payload.new_password)
        .await?;

    Ok(Json(json!({
        "message": "Password updated successfully"
    })))
}

/// Add a train (spawns its seat inventory)
pub async fn add_train(
    State(state): State<AppState>,
    Json(payload): Json<AddTrainRequest>,
) -> AppResult<impl IntoResponse> {
    let train = state
        .registry
        .add(&NewTrain {
            train_number: payload.train_number,
            train_name: payload.train_name,
            departure_date: payload.departure_date,
            origin: payload.origin,
            destination: payload.destination,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!(
                "Train {} on {} added successfully",
                train.train_number, train.departure_date
            ),
            "train": train,
        })),
    ))
}

/// Delete a train (destroys its seat inventory)
pub async fn delete_train(
    State(state): State<AppState>,
    Json(payload): Json<DeleteTrainRequest>,
) -> AppResult<impl IntoResponse> {
    let train = state
        .registry
        .delete(&payload.train_number, payload.departure_date)
        .await?;

    Ok(Json(json!({
        "message": format!(
            "Train {} on {} has been deleted",
            train.train_number, train.departure_date
        )
    })))
}

/// List all trains
pub async fn list_trains(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let trains = state.registry.list_all().await?;
    Ok(Json(trains))
}

/// Search trains by number or by route (with optional date)
pub async fn search_trains(
    State(state): State<AppState>,
    Query(query): Query<TrainSearchQuery>,
) -> AppResult<impl IntoResponse> {
    let trains = match (&query.number, &query.origin, &query.destination) {
        (Some(number), _, _) => state.registry.search_by_number(number).await?,
        (None, Some(origin), Some(destination)) => {
            state
                .registry
                .search_by_route(origin, destination, query.date)
                .await?
        }
        _ => {
            return Err(AppError::InvalidInput(
                "Provide a train number, or both origin and destination".to_string(),
            ));
        }
    };

    Ok(Json(trains))
}

/// Seat listing for a train
pub async fn list_seats(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> AppResult<impl IntoResponse> {
    let seats = state.registry.seats_for(&number).await?;
    let rows: Vec<SeatRow> = seats.into_iter().map(SeatRow::from).collect();

    Ok(Json(rows))
}

/// Book the next available seat of a type
pub async fn book(
    State(state): State<AppState>,
    Json(payload): Json<BookingRequest>,
) -> AppResult<impl IntoResponse> {
    let booking = state
        .booking
        .book(
            &payload.train_number,
            Passenger {
                name: payload.passenger_name,
                age: payload.passenger_age,
                gender: payload.passenger_gender,
            },
            payload.seat_type,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            message: format!(
                "Successfully booked seat {} ({:?}) for {}",
                booking.seat_number, booking.seat_type, booking.passenger.name
            ),
            train_number: booking.train_number,
            seat_number: booking.seat_number,
            seat_type: booking.seat_type,
        }),
    ))
}

/// Cancel a booking, freeing the seat
pub async fn cancel(
    State(state): State<AppState>,
    Json(payload): Json<CancelRequest>,
) -> AppResult<impl IntoResponse> {
    state
        .booking
        .cancel(&payload.train_number, payload.seat_number)
        .await?;

    Ok(Json(json!({
        "message": format!(
            "Seat {} on train {} is now cancelled and available",
            payload.seat_number, payload.train_number
        )
    })))
}
