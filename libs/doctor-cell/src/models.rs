// libs/doctor-cell/src/models.rs
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use shared_config::AppConfig;
use shared_models::error::{AppError, StoreError};

// ==============================================================================
// DOCTOR REFERENCE MODEL
// ==============================================================================

/// Identity anchor owned by the directory. Scheduling only keys off the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub specialty_id: i64,
    pub is_active: bool,
    pub display_name: String,
}

// ==============================================================================
// AVAILABILITY MODELS
// ==============================================================================

/// The day an availability window applies to.
///
/// Weekdays are numbered 0 = Sunday through 6 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum WindowDay {
    Weekly(i32),
    Date(NaiveDate),
}

impl WindowDay {
    pub fn day_of_week(&self) -> i32 {
        match self {
            WindowDay::Weekly(day) => *day,
            WindowDay::Date(date) => weekday_number(*date),
        }
    }

    pub fn specific_date(&self) -> Option<NaiveDate> {
        match self {
            WindowDay::Weekly(_) => None,
            WindowDay::Date(date) => Some(*date),
        }
    }

    pub fn applies_on(&self, date: NaiveDate) -> bool {
        match self {
            WindowDay::Weekly(day) => *day == weekday_number(date),
            WindowDay::Date(d) => *d == date,
        }
    }

    /// Whether two windows on these days can ever be in effect on the same date.
    pub fn collides_with(&self, other: &WindowDay) -> bool {
        match (self, other) {
            (WindowDay::Weekly(a), WindowDay::Weekly(b)) => a == b,
            (WindowDay::Date(a), WindowDay::Date(b)) => a == b,
            (WindowDay::Weekly(day), WindowDay::Date(date))
            | (WindowDay::Date(date), WindowDay::Weekly(day)) => *day == weekday_number(*date),
        }
    }
}

pub fn weekday_number(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_sunday() as i32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: i64,
    pub doctor_id: i64,
    pub day_of_week: i32, // 0 = Sunday, 1 = Monday, etc.
    pub specific_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl AvailabilityWindow {
    pub fn day(&self) -> WindowDay {
        match self.specific_date {
            Some(date) => WindowDay::Date(date),
            None => WindowDay::Weekly(self.day_of_week),
        }
    }

    /// Half-open `[start, end)` containment of a bookable instant.
    pub fn covers(&self, instant: NaiveDateTime) -> bool {
        self.is_active
            && self.day().applies_on(instant.date())
            && self.start_time <= instant.time()
            && instant.time() < self.end_time
    }
}

/// Everything a store persists for a new window; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAvailabilityWindow {
    pub doctor_id: i64,
    pub day_of_week: i32,
    pub specific_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub doctor_id: i64,
    pub day: WindowDay,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Replacement time bounds for an existing window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub day: WindowDay,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub doctor_id: i64,
    pub window_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// Operating range every window must fall within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityRules {
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
}

impl Default for AvailabilityRules {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl AvailabilityRules {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            opening_time: config.opening_time,
            closing_time: config.closing_time,
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvailabilityError {
    #[error("Availability window {0} not found")]
    NotFound(i64),

    #[error("Doctor {0} not found")]
    DoctorNotFound(i64),

    #[error("Invalid availability window: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    #[error("Availability conflicts with existing window {existing_id} ({start} - {end})")]
    Conflict {
        existing_id: i64,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for AvailabilityError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => AvailabilityError::NotFound(id),
            other => AvailabilityError::DatabaseError(other.to_string()),
        }
    }
}

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::NotFound(_) | AvailabilityError::DoctorNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            AvailabilityError::ValidationError(errors) => AppError::ValidationError(errors),
            AvailabilityError::Conflict { .. } => AppError::Conflict(err.to_string()),
            AvailabilityError::DatabaseError(msg) => AppError::Internal(msg),
        }
    }
}
