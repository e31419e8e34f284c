use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use booking_cell::models::{Reservation, ReservationChange, ReservationStatus};
use booking_cell::services::feed::ReservationFeed;
use shared_config::AppConfig;
use shared_database::{StoreError, SupabaseClient};

use crate::models::{AdminError, NewReservation, UpdateReservationRequest};

const RESERVATION_COLUMNS: &str =
    "id,patient_name,phone,practitioner_id,service_id,date,time,status,created_at";

/// Administrative access to the reservation book. Every successful mutation
/// is published on the reservation feed so availability watchers react.
pub struct AdminReservationService {
    supabase: Arc<SupabaseClient>,
    feed: ReservationFeed,
}

impl AdminReservationService {
    pub fn new(config: &AppConfig, feed: ReservationFeed) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            feed,
        }
    }

    /// The reservation book, ordered by date then time. With a date filter,
    /// only that day, ordered by time.
    pub async fn list(
        &self,
        date: Option<NaiveDate>,
        auth_token: &str,
    ) -> Result<Vec<Reservation>, AdminError> {
        let path = match date {
            Some(date) => format!(
                "/rest/v1/reservations?select={}&date=eq.{}&order=time.asc",
                RESERVATION_COLUMNS, date
            ),
            None => format!(
                "/rest/v1/reservations?select={}&order=date.asc,time.asc",
                RESERVATION_COLUMNS
            ),
        };

        let reservations: Vec<Reservation> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(store_error)?;

        Ok(reservations)
    }

    pub async fn create(
        &self,
        new: NewReservation,
        auth_token: &str,
    ) -> Result<Reservation, AdminError> {
        let row = json!({
            "patient_name": new.patient_name,
            "phone": new.phone,
            "practitioner_id": new.practitioner_id,
            "service_id": new.service_id,
            "date": new.date,
            "time": new.time,
            "status": ReservationStatus::Pending,
        });

        let inserted: Vec<Reservation> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/reservations",
                Some(auth_token),
                Some(row),
                Some(representation_headers()),
            )
            .await
            .map_err(store_error)?;

        let reservation = inserted
            .into_iter()
            .next()
            .ok_or_else(|| AdminError::DatabaseError("Insert returned no rows".to_string()))?;

        info!("Reservation {} created by admin", reservation.id);
        self.feed.publish(ReservationChange::inserted(reservation.clone()));
        Ok(reservation)
    }

    /// One-way status transition Pending -> Confirmed.
    pub async fn confirm(&self, id: i64, auth_token: &str) -> Result<Reservation, AdminError> {
        debug!("Confirming reservation {}", id);
        self.patch(id, json!({ "status": ReservationStatus::Confirmed }), auth_token)
            .await
    }

    /// Writes the provided field subset.
    pub async fn update(
        &self,
        id: i64,
        request: UpdateReservationRequest,
        auth_token: &str,
    ) -> Result<Reservation, AdminError> {
        let mut fields = serde_json::Map::new();

        if let Some(patient_name) = request.patient_name {
            fields.insert("patient_name".to_string(), json!(patient_name));
        }
        if let Some(phone) = request.phone {
            fields.insert("phone".to_string(), json!(phone));
        }
        if let Some(practitioner_id) = request.practitioner_id {
            fields.insert("practitioner_id".to_string(), json!(practitioner_id));
        }
        if let Some(service_id) = request.service_id {
            fields.insert("service_id".to_string(), json!(service_id));
        }
        if let Some(date) = request.date {
            fields.insert("date".to_string(), json!(date));
        }
        if let Some(time) = request.time {
            fields.insert("time".to_string(), json!(time));
        }

        if fields.is_empty() {
            return Err(AdminError::ValidationError(
                "No fields to update".to_string(),
            ));
        }

        self.patch(id, Value::Object(fields), auth_token).await
    }

    pub async fn delete(&self, id: i64, auth_token: &str) -> Result<Reservation, AdminError> {
        let path = format!("/rest/v1/reservations?id=eq.{}", id);

        let deleted: Vec<Reservation> = self
            .supabase
            .request_with_headers(
                Method::DELETE,
                &path,
                Some(auth_token),
                None,
                Some(representation_headers()),
            )
            .await
            .map_err(store_error)?;

        let reservation = deleted.into_iter().next().ok_or(AdminError::NotFound)?;

        info!("Reservation {} deleted by admin", id);
        self.feed.publish(ReservationChange::deleted(reservation.clone()));
        Ok(reservation)
    }

    async fn patch(
        &self,
        id: i64,
        fields: Value,
        auth_token: &str,
    ) -> Result<Reservation, AdminError> {
        let path = format!("/rest/v1/reservations?id=eq.{}", id);

        let updated: Vec<Reservation> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(fields),
                Some(representation_headers()),
            )
            .await
            .map_err(store_error)?;

        let reservation = updated.into_iter().next().ok_or(AdminError::NotFound)?;

        self.feed.publish(ReservationChange::updated(reservation.clone()));
        Ok(reservation)
    }
}

fn representation_headers() -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        "Prefer",
        reqwest::header::HeaderValue::from_static("return=representation"),
    );
    headers
}

fn store_error(err: StoreError) -> AdminError {
    match err {
        StoreError::Unreachable(msg) => AdminError::StoreUnavailable(msg),
        StoreError::NotFound(_) => AdminError::NotFound,
        other => AdminError::DatabaseError(other.to_string()),
    }
}
