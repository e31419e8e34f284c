pub mod export;
pub mod reservations;
