use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

/// A bookable member of the clinic staff. Lightly managed reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Practitioner {
    pub id: i64,
    pub name: String,
    pub specialty: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePractitionerRequest {
    pub name: String,
    pub specialty: Option<String>,
}

#[derive(Debug, Error)]
pub enum PractitionerError {
    #[error("Practitioner not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Reservation store is unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<PractitionerError> for AppError {
    fn from(err: PractitionerError) -> Self {
        let message = err.to_string();
        match err {
            PractitionerError::NotFound => AppError::NotFound(message),
            PractitionerError::ValidationError(_) => AppError::ValidationError(message),
            PractitionerError::StoreUnavailable(_) => AppError::ExternalService(message),
            PractitionerError::DatabaseError(_) => AppError::Database(message),
        }
    }
}
