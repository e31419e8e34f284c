use axum::{routing::get, Router};

use admin_cell::router::admin_routes;
use auth_cell::router::auth_routes;
use booking_cell::router::booking_routes;
use booking_cell::BookingState;
use practitioner_cell::router::practitioner_routes;

pub fn create_router(state: BookingState) -> Router {
    Router::new()
        .route("/", get(|| async { "ApexCare Booking API is running!" }))
        .nest("/auth", auth_routes(state.config.clone()))
        .nest("/practitioners", practitioner_routes(state.config.clone()))
        .nest("/bookings", booking_routes(state.clone()))
        .nest("/admin", admin_routes(state))
}
