use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

/// A reservation entered directly from the admin panel. Inserted as Pending,
/// without the public form's validation steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReservation {
    pub patient_name: String,
    pub phone: String,
    pub practitioner_id: String,
    pub service_id: String,
    pub date: NaiveDate,
    pub time: String,
}

/// Field edits; only the provided fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReservationRequest {
    pub patient_name: Option<String>,
    pub phone: Option<String>,
    pub practitioner_id: Option<String>,
    pub service_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Reservation not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Reservation store is unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        let message = err.to_string();
        match err {
            AdminError::NotFound => AppError::NotFound(message),
            AdminError::ValidationError(_) => AppError::ValidationError(message),
            AdminError::StoreUnavailable(_) => AppError::ExternalService(message),
            AdminError::DatabaseError(_) => AppError::Database(message),
        }
    }
}
