// libs/appointment-cell/src/models.rs
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use doctor_cell::models::AvailabilityError;
use shared_config::AppConfig;
use shared_models::error::{AppError, StoreError};

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// A reservation of a single instant with a doctor. Appointments carry no
/// duration; a slot is one point sampled from the doctor's availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: NaiveDateTime,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Appointment {
    /// Holds its slot. Only cancellation releases it.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending = 1,
    Confirmed = 2,
    Cancelled = 3,
    Completed = 4,
}

impl AppointmentStatus {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Cancelled | AppointmentStatus::Completed)
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

impl TryFrom<i32> for AppointmentStatus {
    type Error = AppointmentError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(AppointmentStatus::Pending),
            2 => Ok(AppointmentStatus::Confirmed),
            3 => Ok(AppointmentStatus::Cancelled),
            4 => Ok(AppointmentStatus::Completed),
            other => Err(AppointmentError::ValidationError(vec![format!(
                "Unknown appointment status code {}",
                other
            )])),
        }
    }
}

/// Fields a caller supplies; the store assigns id, status and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: NaiveDateTime,
    pub notes: Option<String>,
}

/// Read-model projection with display data for doctor, patient and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDetails {
    pub appointment: Appointment,
    pub status_code: i32,
    pub status_label: String,
    pub doctor_name: Option<String>,
    pub patient_name: Option<String>,
}

impl AppointmentDetails {
    pub fn from_appointment(appointment: Appointment) -> Self {
        Self {
            status_code: appointment.status.code(),
            status_label: appointment.status.label().to_string(),
            appointment,
            doctor_name: None,
            patient_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub display_name: String,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: NaiveDateTime,
    pub patient_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub new_appointment_date: NaiveDateTime,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment {0} not found")]
    NotFound(i64),

    #[error("Patient {0} not found")]
    PatientNotFound(i64),

    #[error("Doctor {0} not found")]
    DoctorNotFound(i64),

    #[error("Availability window {0} not found")]
    AvailabilityNotFound(i64),

    #[error("Validation error: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    #[error("The appointment overlaps an existing one for doctor {doctor_id} at {appointment_date}")]
    ConflictDetected {
        doctor_id: i64,
        appointment_date: NaiveDateTime,
    },

    #[error("Doctor {doctor_id} is not available at the requested time {appointment_date}")]
    DoctorNotAvailable {
        doctor_id: i64,
        appointment_date: NaiveDateTime,
    },

    #[error("{0}")]
    AvailabilityConflict(String),

    #[error("Appointment cannot move from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Appointment cannot be modified in current status: {0}")]
    TerminalStatus(AppointmentStatus),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl From<StoreError> for AppointmentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => AppointmentError::NotFound(id),
            other => AppointmentError::DatabaseError(other.to_string()),
        }
    }
}

impl From<AvailabilityError> for AppointmentError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::ValidationError(errors) => AppointmentError::ValidationError(errors),
            AvailabilityError::NotFound(id) => AppointmentError::AvailabilityNotFound(id),
            AvailabilityError::DoctorNotFound(id) => AppointmentError::DoctorNotFound(id),
            AvailabilityError::Conflict { .. } => AppointmentError::AvailabilityConflict(err.to_string()),
            AvailabilityError::DatabaseError(msg) => AppointmentError::DatabaseError(msg),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::ValidationError(errors) => AppError::ValidationError(errors),
            AppointmentError::NotFound(_)
            | AppointmentError::PatientNotFound(_)
            | AppointmentError::DoctorNotFound(_)
            | AppointmentError::AvailabilityNotFound(_) => AppError::NotFound(err.to_string()),
            AppointmentError::ConflictDetected { .. }
            | AppointmentError::AvailabilityConflict(_)
            | AppointmentError::DoctorNotAvailable { .. }
            | AppointmentError::InvalidStatusTransition { .. }
            | AppointmentError::TerminalStatus(_) => AppError::Conflict(err.to_string()),
            AppointmentError::DatabaseError(msg) | AppointmentError::ExternalServiceError(msg) => {
                AppError::Internal(msg)
            }
        }
    }
}

// ==============================================================================
// VALIDATION MODELS
// ==============================================================================

#[derive(Debug, Clone)]
pub struct AppointmentValidationRules {
    pub past_tolerance_minutes: i64,
    pub require_availability_window: bool,
    pub default_slot_minutes: i64,
}

impl Default for AppointmentValidationRules {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl AppointmentValidationRules {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            past_tolerance_minutes: config.past_tolerance_minutes,
            require_availability_window: config.require_availability_window,
            default_slot_minutes: config.default_slot_minutes,
        }
    }
}
