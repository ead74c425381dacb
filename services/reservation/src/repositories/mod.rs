//! Repositories for database operations

pub mod code;
pub mod seat;
pub mod train;
pub mod user;

pub use code::CodeRepository;
pub use seat::SeatRepository;
pub use train::TrainRepository;
pub use user::UserRepository;
