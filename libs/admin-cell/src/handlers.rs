use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::TypedHeader;
use chrono::NaiveDate;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use booking_cell::BookingState;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{NewReservation, UpdateReservationRequest};
use crate::services::export::{export_filename, render_export};
use crate::services::reservations::AdminReservationService;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<NaiveDate>,
}

#[axum::debug_handler]
pub async fn list_reservations(
    State(state): State<BookingState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    debug!("Admin {} listing reservations (date: {:?})", user.id, query.date);

    let service = AdminReservationService::new(&state.config, state.feed.clone());
    let reservations = service.list(query.date, auth.token()).await?;

    Ok(Json(json!({
        "reservations": reservations,
        "total": reservations.len()
    })))
}

#[axum::debug_handler]
pub async fn create_reservation(
    State(state): State<BookingState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<NewReservation>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    debug!("Admin {} creating reservation", user.id);

    let service = AdminReservationService::new(&state.config, state.feed.clone());
    let reservation = service.create(request, auth.token()).await?;

    Ok((StatusCode::CREATED, Json(json!(reservation))))
}

#[axum::debug_handler]
pub async fn confirm_reservation(
    State(state): State<BookingState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(reservation_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    debug!("Admin {} confirming reservation {}", user.id, reservation_id);

    let service = AdminReservationService::new(&state.config, state.feed.clone());
    let reservation = service.confirm(reservation_id, auth.token()).await?;

    Ok(Json(json!(reservation)))
}

#[axum::debug_handler]
pub async fn update_reservation(
    State(state): State<BookingState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(reservation_id): Path<i64>,
    Json(request): Json<UpdateReservationRequest>,
) -> Result<Json<Value>, AppError> {
    debug!("Admin {} updating reservation {}", user.id, reservation_id);

    let service = AdminReservationService::new(&state.config, state.feed.clone());
    let reservation = service.update(reservation_id, request, auth.token()).await?;

    Ok(Json(json!(reservation)))
}

#[axum::debug_handler]
pub async fn delete_reservation(
    State(state): State<BookingState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(reservation_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    debug!("Admin {} deleting reservation {}", user.id, reservation_id);

    let service = AdminReservationService::new(&state.config, state.feed.clone());
    service.delete(reservation_id, auth.token()).await?;

    Ok(Json(json!({ "deleted": reservation_id })))
}

/// Downloads the (optionally date-filtered) reservation book as a document.
#[axum::debug_handler]
pub async fn export_reservations(
    State(state): State<BookingState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Admin {} exporting reservations (date: {:?})", user.id, query.date);

    let service = AdminReservationService::new(&state.config, state.feed.clone());
    let reservations = service.list(query.date, auth.token()).await?;

    let body = render_export(&reservations, query.date);
    let disposition = format!("attachment; filename=\"{}\"", export_filename(query.date));

    Ok((
        [
            (header::CONTENT_TYPE, "application/msword".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
