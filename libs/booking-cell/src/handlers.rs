use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use futures::{Sink, SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use shared_models::error::AppError;

use crate::models::{AvailabilitySnapshot, BookReservationRequest, Reservation, SelectionKey, SERVICES};
use crate::services::booking::BookingService;
use crate::BookingState;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub practitioner_id: String,
}

impl AvailabilityQuery {
    fn into_key(self) -> SelectionKey {
        SelectionKey::new(self.date, self.practitioner_id)
    }
}

// ==============================================================================
// PUBLIC HANDLERS (NO AUTHENTICATION REQUIRED)
// ==============================================================================

#[axum::debug_handler]
pub async fn get_slot_grid(State(state): State<BookingState>) -> Json<Value> {
    Json(json!({ "slots": state.resolver.grid() }))
}

#[axum::debug_handler]
pub async fn list_services() -> Json<Value> {
    Json(json!({ "services": SERVICES }))
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<BookingState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilitySnapshot>, AppError> {
    let snapshot = state.resolver.resolve(&query.into_key(), None).await?;
    Ok(Json(snapshot))
}

#[axum::debug_handler]
pub async fn create_reservation(
    State(state): State<BookingState>,
    Json(request): Json<BookReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>), AppError> {
    let service = BookingService::new(&state.config, state.feed.clone());
    let reservation = service.book(request, None).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Upgrades to a WebSocket that pushes a fresh availability snapshot whenever
/// a reservation change for the watched (date, practitioner) arrives.
pub async fn watch_availability(
    ws: WebSocketUpgrade,
    State(state): State<BookingState>,
    Query(query): Query<AvailabilityQuery>,
) -> impl IntoResponse {
    let key = query.into_key();
    ws.on_upgrade(move |socket| watch_loop(socket, state, key))
}

async fn watch_loop(socket: WebSocket, state: BookingState, key: SelectionKey) {
    let mut events = state.feed.subscribe();
    let (mut sink, mut stream) = socket.split();

    match state.resolver.resolve(&key, None).await {
        Ok(snapshot) => {
            if send_snapshot(&mut sink, &snapshot).await.is_err() {
                return;
            }
        }
        Err(err) => {
            warn!(
                "Closing availability watch for {} / {}: {}",
                key.date, key.practitioner_id, err
            );
            let _ = sink.close().await;
            return;
        }
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(change) if change.touches(&key) => {
                    if push_refresh(&mut sink, &state, &key).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    // Missed events; refresh unconditionally instead of
                    // guessing which selections they touched.
                    debug!("Availability watcher lagged by {} changes, refreshing", skipped);
                    if push_refresh(&mut sink, &state, &key).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Closed) => break,
            },
            message = stream.next() => match message {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    // Dropping the receiver here releases the feed subscription with the
    // connection.
    debug!(
        "Availability watch for {} / {} ended",
        key.date, key.practitioner_id
    );
}

async fn push_refresh(
    sink: &mut (impl Sink<Message> + Unpin),
    state: &BookingState,
    key: &SelectionKey,
) -> Result<(), ()> {
    match state.resolver.resolve(key, None).await {
        Ok(snapshot) => send_snapshot(sink, &snapshot).await,
        Err(err) => {
            // The watcher keeps its previous list; nothing useful to push.
            warn!(
                "Availability refresh failed for {} / {}: {}",
                key.date, key.practitioner_id, err
            );
            Ok(())
        }
    }
}

async fn send_snapshot(
    sink: &mut (impl Sink<Message> + Unpin),
    snapshot: &AvailabilitySnapshot,
) -> Result<(), ()> {
    let payload = match serde_json::to_string(snapshot) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("Failed to encode availability snapshot: {}", err);
            return Err(());
        }
    };
    sink.send(Message::Text(payload.into())).await.map_err(|_| ())
}
