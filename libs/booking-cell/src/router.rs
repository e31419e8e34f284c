use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::BookingState;

/// Public booking surface: everything the widget needs, no authentication.
pub fn booking_routes(state: BookingState) -> Router {
    Router::new()
        .route("/", post(handlers::create_reservation))
        .route("/slots", get(handlers::get_slot_grid))
        .route("/services", get(handlers::list_services))
        .route("/availability", get(handlers::get_availability))
        .route("/availability/watch", get(handlers::watch_availability))
        .with_state(state)
}
