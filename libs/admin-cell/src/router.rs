use axum::{
    middleware,
    routing::{get, patch},
    Router,
};

use booking_cell::BookingState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Administrative surface; every route requires an authenticated session.
pub fn admin_routes(state: BookingState) -> Router {
    Router::new()
        .route(
            "/reservations",
            get(handlers::list_reservations).post(handlers::create_reservation),
        )
        .route("/reservations/export", get(handlers::export_reservations))
        .route(
            "/reservations/{reservation_id}",
            patch(handlers::update_reservation).delete(handlers::delete_reservation),
        )
        .route(
            "/reservations/{reservation_id}/confirm",
            patch(handlers::confirm_reservation),
        )
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
