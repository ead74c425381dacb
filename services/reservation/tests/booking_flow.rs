//! Integration tests for the train registry and booking engine
//!
//! These tests run against an in-memory SQLite database with the same
//! single-connection pool the service uses.

use chrono::NaiveDate;
use common::database::{DatabaseConfig, init_pool};
use reservation::{
    AppState,
    error::AppError,
    mailer::Mailer,
    models::{NewTrain, Passenger, SeatType},
    repositories::SeatRepository,
    schema::ensure_schema,
};

async fn setup() -> AppState {
    let config = DatabaseConfig {
        database_url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    let pool = init_pool(&config).await.expect("Failed to create pool");
    ensure_schema(&pool).await.expect("Failed to create schema");
    AppState::new(pool, Mailer::Disabled)
}

fn train(number: &str, date: &str) -> NewTrain {
    NewTrain {
        train_number: number.to_string(),
        train_name: format!("Express {}", number),
        departure_date: date.parse::<NaiveDate>().expect("bad date literal"),
        origin: "Mumbai".to_string(),
        destination: "Delhi".to_string(),
    }
}

fn passenger(name: &str) -> Passenger {
    Passenger {
        name: name.to_string(),
        age: 30,
        gender: "Female".to_string(),
    }
}

#[tokio::test]
async fn test_adding_a_train_creates_fifty_typed_seats() {
    let state = setup().await;
    state
        .registry
        .add(&train("12951", "2026-09-15"))
        .await
        .expect("add failed");

    let seats = state.registry.seats_for("12951").await.expect("list failed");
    assert_eq!(seats.len(), 50);

    let window = seats.iter().filter(|s| s.seat_type == SeatType::Window).count();
    let aisle = seats.iter().filter(|s| s.seat_type == SeatType::Aisle).count();
    let middle = seats.iter().filter(|s| s.seat_type == SeatType::Middle).count();
    assert_eq!(window, 20);
    assert_eq!(aisle, 20);
    assert_eq!(middle, 10);

    assert!(seats.iter().all(|s| !s.booked));
    assert!(seats.iter().all(|s| s.passenger_name.is_empty()));

    // Ascending seat numbers
    let numbers: Vec<i64> = seats.iter().map(|s| s.seat_number).collect();
    assert_eq!(numbers, (1..=50).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_duplicate_train_rejected_different_date_allowed() {
    let state = setup().await;
    state.registry.add(&train("12951", "2026-09-15")).await.unwrap();

    let err = state
        .registry
        .add(&train("12951", "2026-09-15"))
        .await
        .expect_err("duplicate accepted");
    assert!(matches!(err, AppError::DuplicateTrain));

    // Same number, different departure date is a distinct train
    state.registry.add(&train("12951", "2026-09-16")).await.unwrap();
    assert_eq!(state.registry.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_train_number_sanitization() {
    let state = setup().await;
    let err = state
        .registry
        .add(&train("12951; DROP TABLE trains", "2026-09-15"))
        .await
        .expect_err("unsanitized number accepted");
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn test_booking_assigns_first_window_seat() {
    let state = setup().await;
    state.registry.add(&train("12951", "2026-09-15")).await.unwrap();

    let booking = state
        .booking
        .book("12951", passenger("Asha"), SeatType::Window)
        .await
        .expect("booking failed");

    // First free Window seat under the mod-10 layout
    assert_eq!(booking.seat_number, 4);
    assert_eq!(booking.seat_type, SeatType::Window);

    let seats = state.registry.seats_for("12951").await.unwrap();
    let seat = seats.iter().find(|s| s.seat_number == 4).unwrap();
    assert!(seat.booked);
    assert_eq!(seat.passenger_name, "Asha");
    assert_eq!(seat.passenger_age, Some(30));
    assert_eq!(seat.passenger_gender, "Female");
}

#[tokio::test]
async fn test_next_available_never_returns_a_booked_seat() {
    let state = setup().await;
    state.registry.add(&train("12951", "2026-09-15")).await.unwrap();

    let first = state
        .booking
        .book("12951", passenger("Asha"), SeatType::Window)
        .await
        .unwrap();
    let second = state
        .booking
        .book("12951", passenger("Ravi"), SeatType::Window)
        .await
        .unwrap();

    assert_eq!(first.seat_number, 4);
    assert_eq!(second.seat_number, 5);
}

#[tokio::test]
async fn test_book_then_cancel_round_trip() {
    let state = setup().await;
    state.registry.add(&train("12951", "2026-09-15")).await.unwrap();

    let booking = state
        .booking
        .book("12951", passenger("Asha"), SeatType::Window)
        .await
        .unwrap();
    state
        .booking
        .cancel("12951", booking.seat_number)
        .await
        .expect("cancel failed");

    let seats = state.registry.seats_for("12951").await.unwrap();
    let seat = seats
        .iter()
        .find(|s| s.seat_number == booking.seat_number)
        .unwrap();
    assert!(!seat.booked);
    assert!(seat.passenger_name.is_empty());
    assert_eq!(seat.passenger_age, None);
    assert!(seat.passenger_gender.is_empty());
}

#[tokio::test]
async fn test_no_seat_available_after_type_is_full() {
    let state = setup().await;
    state.registry.add(&train("12951", "2026-09-15")).await.unwrap();

    for i in 0..10 {
        state
            .booking
            .book("12951", passenger(&format!("P{}", i)), SeatType::Middle)
            .await
            .expect("middle booking failed");
    }

    let err = state
        .booking
        .book("12951", passenger("Late"), SeatType::Middle)
        .await
        .expect_err("overbooked");
    assert!(matches!(err, AppError::NoSeatAvailable));

    // Other types are unaffected
    state
        .booking
        .book("12951", passenger("Asha"), SeatType::Window)
        .await
        .expect("window booking failed");
}

#[tokio::test]
async fn test_unknown_train_rejected_for_book_and_cancel() {
    let state = setup().await;

    let err = state
        .booking
        .book("99999", passenger("Asha"), SeatType::Window)
        .await
        .expect_err("booked on missing train");
    assert!(matches!(err, AppError::TrainNotFound));

    let err = state
        .booking
        .cancel("99999", 4)
        .await
        .expect_err("cancelled on missing train");
    assert!(matches!(err, AppError::TrainNotFound));
}

#[tokio::test]
async fn test_cancel_of_unbooked_seat_is_noop_success() {
    let state = setup().await;
    state.registry.add(&train("12951", "2026-09-15")).await.unwrap();

    state.booking.cancel("12951", 7).await.expect("cancel errored");

    // Out-of-range seat numbers are equally silent
    state.booking.cancel("12951", 51).await.expect("cancel errored");
}

#[tokio::test]
async fn test_booking_resolves_earliest_departure_on_number_collision() {
    let state = setup().await;
    let later = state.registry.add(&train("12951", "2026-10-01")).await.unwrap();
    let earlier = state.registry.add(&train("12951", "2026-09-15")).await.unwrap();

    state
        .booking
        .book("12951", passenger("Asha"), SeatType::Window)
        .await
        .unwrap();

    let seats = SeatRepository::new(state.db_pool.clone());
    let earlier_seat = seats.find(earlier.id, 4).await.unwrap().unwrap();
    let later_seat = seats.find(later.id, 4).await.unwrap().unwrap();
    assert!(earlier_seat.booked);
    assert!(!later_seat.booked);
}

#[tokio::test]
async fn test_delete_train_requires_exact_match_and_destroys_seats() {
    let state = setup().await;
    let added = state.registry.add(&train("12951", "2026-09-15")).await.unwrap();

    // Wrong date: miss
    let err = state
        .registry
        .delete("12951", "2026-09-16".parse().unwrap())
        .await
        .expect_err("deleted with wrong date");
    assert!(matches!(err, AppError::NotFound(_)));

    state
        .registry
        .delete("12951", "2026-09-15".parse().unwrap())
        .await
        .expect("delete failed");

    assert!(state.registry.list_all().await.unwrap().is_empty());

    let seats = SeatRepository::new(state.db_pool.clone());
    assert!(seats.list(added.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_and_listing() {
    let state = setup().await;
    state.registry.add(&train("12951", "2026-09-20")).await.unwrap();
    state.registry.add(&train("12951", "2026-09-15")).await.unwrap();
    let mut other = train("12003", "2026-09-15");
    other.origin = "Chennai".to_string();
    state.registry.add(&other).await.unwrap();

    let by_number = state.registry.search_by_number("12951").await.unwrap();
    assert_eq!(by_number.len(), 2);

    let by_route = state
        .registry
        .search_by_route("Mumbai", "Delhi", None)
        .await
        .unwrap();
    assert_eq!(by_route.len(), 2);

    let by_route_dated = state
        .registry
        .search_by_route("Mumbai", "Delhi", Some("2026-09-20".parse().unwrap()))
        .await
        .unwrap();
    assert_eq!(by_route_dated.len(), 1);
    assert_eq!(
        by_route_dated[0].departure_date,
        "2026-09-20".parse::<NaiveDate>().unwrap()
    );

    // list_all orders by (departure_date, train_number) ascending
    let all = state.registry.list_all().await.unwrap();
    let keys: Vec<(String, String)> = all
        .iter()
        .map(|t| (t.departure_date.to_string(), t.train_number.clone()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("2026-09-15".to_string(), "12003".to_string()),
            ("2026-09-15".to_string(), "12951".to_string()),
            ("2026-09-20".to_string(), "12951".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_seat_inventory_initialization_is_idempotent() {
    let state = setup().await;
    let added = state.registry.add(&train("12951", "2026-09-15")).await.unwrap();

    let seats = SeatRepository::new(state.db_pool.clone());
    seats.initialize(added.id).await.expect("re-init errored");

    assert_eq!(seats.list(added.id).await.unwrap().len(), 50);
}
