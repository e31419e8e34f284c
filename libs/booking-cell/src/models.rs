// libs/booking-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

// ==============================================================================
// CORE RESERVATION MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub patient_name: String,
    pub phone: String,
    pub practitioner_id: String,
    pub service_id: String,
    pub date: NaiveDate,
    /// Time of day as "HH:MM", drawn from the daily slot grid.
    pub time: String,
    pub status: ReservationStatus,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationStatus::Pending => write!(f, "Pending"),
            ReservationStatus::Confirmed => write!(f, "Confirmed"),
        }
    }
}

/// A prospective reservation as submitted by the booking form. Date and time
/// stay optional so their absence can be reported as a validation error
/// rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookReservationRequest {
    pub patient_name: String,
    pub phone: String,
    pub practitioner_id: String,
    pub service_id: String,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

// ==============================================================================
// AVAILABILITY MODELS
// ==============================================================================

/// The (date, practitioner) pair a booking view is currently looking at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionKey {
    pub date: NaiveDate,
    pub practitioner_id: String,
}

impl SelectionKey {
    pub fn new(date: NaiveDate, practitioner_id: impl Into<String>) -> Self {
        Self {
            date,
            practitioner_id: practitioner_id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySnapshot {
    pub date: NaiveDate,
    pub practitioner_id: String,
    pub free_slots: Vec<String>,
    /// True when the store was unreachable and this is the last list that
    /// could be fetched successfully.
    pub stale: bool,
    pub as_of: DateTime<Utc>,
}

// ==============================================================================
// CHANGE FEED MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A reservation row change, carrying the old and/or new row the way the
/// store's own change payloads do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationChange {
    pub kind: ChangeKind,
    pub old: Option<Reservation>,
    pub new: Option<Reservation>,
}

impl ReservationChange {
    pub fn inserted(new: Reservation) -> Self {
        Self {
            kind: ChangeKind::Insert,
            old: None,
            new: Some(new),
        }
    }

    pub fn updated(new: Reservation) -> Self {
        Self {
            kind: ChangeKind::Update,
            old: None,
            new: Some(new),
        }
    }

    pub fn deleted(old: Reservation) -> Self {
        Self {
            kind: ChangeKind::Delete,
            old: Some(old),
            new: None,
        }
    }

    /// Whether the change concerns the given selection, judged against the
    /// old or the new row.
    pub fn touches(&self, key: &SelectionKey) -> bool {
        let matches = |row: &Reservation| {
            row.date == key.date && row.practitioner_id == key.practitioner_id
        };
        self.new.as_ref().map(&matches).unwrap_or(false)
            || self.old.as_ref().map(&matches).unwrap_or(false)
    }
}

// ==============================================================================
// SERVICE CATALOG
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ClinicService {
    pub id: &'static str,
    pub name: &'static str,
    pub duration_minutes: u32,
    pub description: &'static str,
}

/// The treatments offered by the clinic. Static reference data served to the
/// booking widget; not persisted.
pub const SERVICES: &[ClinicService] = &[
    ClinicService {
        id: "consultation",
        name: "Consultation",
        duration_minutes: 30,
        description: "Complete dental health examination, professional diagnosis and a personalised treatment plan.",
    },
    ClinicService {
        id: "scaling",
        name: "Scaling",
        duration_minutes: 60,
        description: "Deep professional cleaning removing tartar and bacterial plaque for optimal oral hygiene.",
    },
    ClinicService {
        id: "extraction",
        name: "Extraction",
        duration_minutes: 45,
        description: "Safe, pain-free tooth extraction performed with modern techniques.",
    },
    ClinicService {
        id: "implant",
        name: "Dental Implant",
        duration_minutes: 120,
        description: "Durable tooth replacement using advanced technology for natural, long-lasting results.",
    },
    ClinicService {
        id: "orthodontics",
        name: "Orthodontics",
        duration_minutes: 90,
        description: "Teeth alignment with modern braces for a harmonious smile.",
    },
    ClinicService {
        id: "cosmetic",
        name: "Cosmetic Dentistry",
        duration_minutes: 60,
        description: "Aesthetic treatments for a bright smile: professional whitening, veneers and cosmetic procedures.",
    },
];

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, Error)]
pub enum BookingError {
    #[error("Date and time are required")]
    IncompleteInput,

    #[error("The selected date is in the past")]
    PastDate,

    #[error("This time slot has already been booked")]
    SlotTaken,

    // The insert raced past the pre-check and hit the store's uniqueness
    // index. Shown to callers exactly like SlotTaken.
    #[error("This time slot has already been booked")]
    DuplicateAtInsertTime,

    #[error("Reservation store is unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let message = err.to_string();
        match err {
            BookingError::IncompleteInput | BookingError::PastDate => {
                AppError::ValidationError(message)
            }
            BookingError::SlotTaken | BookingError::DuplicateAtInsertTime => {
                AppError::Conflict(message)
            }
            BookingError::StoreUnavailable(_) => AppError::ExternalService(message),
            BookingError::DatabaseError(_) => AppError::Database(message),
        }
    }
}
