// libs/appointment-cell/src/services/conflict.rs
use std::sync::Arc;

use chrono::{NaiveDateTime, NaiveTime};
use tracing::{debug, warn};

use doctor_cell::models::{weekday_number, AvailabilityWindow, WindowDay};
use doctor_cell::services::conflict::find_window_conflict;
use doctor_cell::services::AvailabilityStore;
use shared_models::error::StoreError;

use crate::models::Appointment;
use crate::services::store::AppointmentStore;

/// Active appointment of `doctor_id` already holding exactly `instant`.
///
/// Appointments are points, so a collision is an equality test.
pub fn find_appointment_collision<'a, I>(
    existing: I,
    doctor_id: i64,
    instant: NaiveDateTime,
    exclude_appointment_id: Option<i64>,
) -> Option<&'a Appointment>
where
    I: IntoIterator<Item = &'a Appointment>,
{
    existing.into_iter().find(|a| {
        a.doctor_id == doctor_id
            && a.appointment_date == instant
            && a.is_active()
            && Some(a.id) != exclude_appointment_id
    })
}

/// Read-only conflict checks over both stores. Nothing here writes.
pub struct ConflictDetectionService {
    appointments: Arc<dyn AppointmentStore>,
    availability: Arc<dyn AvailabilityStore>,
}

impl ConflictDetectionService {
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        availability: Arc<dyn AvailabilityStore>,
    ) -> Self {
        Self { appointments, availability }
    }

    /// True if another active window of the doctor overlaps `[start, end)` on `day`
    pub async fn window_conflict(
        &self,
        doctor_id: i64,
        day: &WindowDay,
        start_time: NaiveTime,
        end_time: NaiveTime,
        exclude_window_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        debug!(
            "Checking window conflicts for doctor {} from {} to {}",
            doctor_id, start_time, end_time
        );

        let existing = self
            .availability
            .list_by_doctor_and_day(doctor_id, day.day_of_week())
            .await?;

        let conflict =
            find_window_conflict(&existing, doctor_id, day, start_time, end_time, exclude_window_id);
        if let Some(window) = conflict {
            warn!("Window conflict detected for doctor {} with window {}", doctor_id, window.id);
        }
        Ok(conflict.is_some())
    }

    /// True if an active appointment already exists for the doctor at `instant`
    pub async fn appointment_conflict(
        &self,
        doctor_id: i64,
        instant: NaiveDateTime,
        exclude_appointment_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        debug!("Checking appointment conflicts for doctor {} at {}", doctor_id, instant);

        let taken = self
            .appointments
            .exists_in_time_slot(doctor_id, instant, exclude_appointment_id)
            .await?;

        if taken {
            warn!("Appointment conflict detected for doctor {} at {}", doctor_id, instant);
        }
        Ok(taken)
    }

    /// The active window in effect for the doctor at `instant`, if any
    pub async fn covering_window(
        &self,
        doctor_id: i64,
        instant: NaiveDateTime,
    ) -> Result<Option<AvailabilityWindow>, StoreError> {
        let windows = self
            .availability
            .list_by_doctor_and_day(doctor_id, weekday_number(instant.date()))
            .await?;

        Ok(windows.into_iter().find(|w| w.covers(instant)))
    }
}
