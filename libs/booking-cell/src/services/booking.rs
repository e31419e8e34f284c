use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::{StoreError, SupabaseClient};

use crate::models::{
    BookReservationRequest, BookingError, Reservation, ReservationChange, ReservationStatus,
};
use crate::services::feed::ReservationFeed;

pub struct BookingService {
    supabase: Arc<SupabaseClient>,
    feed: ReservationFeed,
    clinic_tz: Tz,
}

impl BookingService {
    pub fn new(config: &AppConfig, feed: ReservationFeed) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            feed,
            clinic_tz: config.clinic_timezone,
        }
    }

    /// Validates and inserts a prospective reservation.
    ///
    /// The slot check and the insert are separate store calls; a booking that
    /// races past the check is caught by the store's uniqueness index and
    /// surfaces as [`BookingError::DuplicateAtInsertTime`].
    pub async fn book(
        &self,
        request: BookReservationRequest,
        auth_token: Option<&str>,
    ) -> Result<Reservation, BookingError> {
        let (date, time) = match (request.date, request.time.as_deref()) {
            (Some(date), Some(time)) if !time.is_empty() => (date, time.to_string()),
            _ => return Err(BookingError::IncompleteInput),
        };

        let today = self.today();
        if date < today {
            debug!("Rejecting booking for past date {} (today is {})", date, today);
            return Err(BookingError::PastDate);
        }

        if self
            .slot_taken(date, &request.practitioner_id, &time, auth_token)
            .await?
        {
            return Err(BookingError::SlotTaken);
        }

        let row = json!({
            "patient_name": request.patient_name,
            "phone": request.phone,
            "practitioner_id": request.practitioner_id,
            "service_id": request.service_id,
            "date": date,
            "time": time,
            "status": ReservationStatus::Pending,
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Reservation> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/reservations",
                auth_token,
                Some(row),
                Some(headers),
            )
            .await
            .map_err(insert_error)?;

        let reservation = result
            .into_iter()
            .next()
            .ok_or_else(|| BookingError::DatabaseError("Insert returned no rows".to_string()))?;

        info!(
            "Reservation {} created for practitioner {} on {} at {}",
            reservation.id, reservation.practitioner_id, reservation.date, reservation.time
        );
        self.feed.publish(ReservationChange::inserted(reservation.clone()));

        Ok(reservation)
    }

    /// "Today" at day granularity in the clinic's civil timezone, regardless
    /// of where the caller is.
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.clinic_tz).date_naive()
    }

    async fn slot_taken(
        &self,
        date: NaiveDate,
        practitioner_id: &str,
        time: &str,
        auth_token: Option<&str>,
    ) -> Result<bool, BookingError> {
        let path = format!(
            "/rest/v1/reservations?select=id&date=eq.{}&practitioner_id=eq.{}&time=eq.{}",
            date,
            urlencoding::encode(practitioner_id),
            urlencoding::encode(time),
        );

        let existing: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(read_error)?;

        Ok(!existing.is_empty())
    }
}

fn read_error(err: StoreError) -> BookingError {
    match err {
        StoreError::Unreachable(msg) => BookingError::StoreUnavailable(msg),
        other => BookingError::DatabaseError(other.to_string()),
    }
}

fn insert_error(err: StoreError) -> BookingError {
    match err {
        StoreError::Conflict(_) => BookingError::DuplicateAtInsertTime,
        StoreError::Unreachable(msg) => BookingError::StoreUnavailable(msg),
        other => BookingError::DatabaseError(other.to_string()),
    }
}
