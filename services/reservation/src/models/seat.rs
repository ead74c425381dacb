//! Seat model and seat-type categorization

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Number of seats in every train's inventory
pub const SEATS_PER_TRAIN: i64 = 50;

/// Seat category within a coach
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
pub enum SeatType {
    Window,
    Aisle,
    Middle,
}

impl SeatType {
    /// Derive the seat type assigned to a seat number at inventory creation.
    ///
    /// The layout repeats every ten seats: remainders {0, 4, 5, 9} sit at a
    /// window, {2, 3, 6, 7} on the aisle, the rest in the middle.
    pub fn for_seat(seat_number: i64) -> Self {
        match seat_number % 10 {
            0 | 4 | 5 | 9 => SeatType::Window,
            2 | 3 | 6 | 7 => SeatType::Aisle,
            _ => SeatType::Middle,
        }
    }
}

/// Seat entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Seat {
    pub train_id: i64,
    pub seat_number: i64,
    pub seat_type: SeatType,
    pub booked: bool,
    pub passenger_name: String,
    pub passenger_age: Option<i64>,
    pub passenger_gender: String,
}

/// Passenger details captured at booking time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub name: String,
    pub age: i64,
    pub gender: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_type_follows_mod_ten_rule() {
        assert_eq!(SeatType::for_seat(4), SeatType::Window);
        assert_eq!(SeatType::for_seat(5), SeatType::Window);
        assert_eq!(SeatType::for_seat(9), SeatType::Window);
        assert_eq!(SeatType::for_seat(10), SeatType::Window);
        assert_eq!(SeatType::for_seat(2), SeatType::Aisle);
        assert_eq!(SeatType::for_seat(3), SeatType::Aisle);
        assert_eq!(SeatType::for_seat(6), SeatType::Aisle);
        assert_eq!(SeatType::for_seat(7), SeatType::Aisle);
        assert_eq!(SeatType::for_seat(1), SeatType::Middle);
        assert_eq!(SeatType::for_seat(8), SeatType::Middle);
    }

    #[test]
    fn test_seat_type_distribution_over_full_inventory() {
        let mut window = 0;
        let mut aisle = 0;
        let mut middle = 0;
        for n in 1..=SEATS_PER_TRAIN {
            match SeatType::for_seat(n) {
                SeatType::Window => window += 1,
                SeatType::Aisle => aisle += 1,
                SeatType::Middle => middle += 1,
            }
        }
        assert_eq!(window, 20);
        assert_eq!(aisle, 20);
        assert_eq!(middle, 10);
    }
}
