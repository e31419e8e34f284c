use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn practitioner_routes(state: Arc<AppConfig>) -> Router {
    // The roster is public so the widget can render its dropdown.
    let public_routes = Router::new().route("/", get(handlers::list_practitioners));

    // Management requires an authenticated session.
    let protected_routes = Router::new()
        .route("/", post(handlers::create_practitioner))
        .route("/{practitioner_id}", delete(handlers::delete_practitioner))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
