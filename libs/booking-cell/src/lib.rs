pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

use std::sync::Arc;

use shared_config::AppConfig;

use services::availability::AvailabilityResolver;
use services::feed::ReservationFeed;

/// Shared state for every route that reads or mutates reservations: the
/// config, the live change feed, and the availability resolver with its
/// last-known-good cache.
#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub feed: ReservationFeed,
    pub resolver: AvailabilityResolver,
}

impl BookingState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let feed = ReservationFeed::new();
        let resolver = AvailabilityResolver::new(&config);
        Self {
            config,
            feed,
            resolver,
        }
    }
}

pub use models::{
    AvailabilitySnapshot, BookReservationRequest, BookingError, ChangeKind, ClinicService,
    Reservation, ReservationChange, ReservationStatus, SelectionKey, SERVICES,
};
