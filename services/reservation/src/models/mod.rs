//! Reservation service models

pub mod code;
pub mod seat;
pub mod train;
pub mod user;

// Re-export for convenience
pub use code::{CodePurpose, VerificationCode};
pub use seat::{Passenger, Seat, SeatType};
pub use train::{NewTrain, Train};
pub use user::{Employee, NewUser, Role, User};
