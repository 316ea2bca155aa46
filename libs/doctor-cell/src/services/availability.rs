// libs/doctor-cell/src/services/availability.rs
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::{debug, info, warn};

use shared_utils::{Clock, DoctorLocks};

use crate::models::{
    weekday_number, AvailabilityError, AvailabilityRules, AvailabilityWindow, AvailableSlot,
    CreateAvailabilityRequest, NewAvailabilityWindow, UpdateAvailabilityRequest, WindowDay,
};
use crate::services::conflict::find_window_conflict;
use crate::services::registry::DoctorRegistry;
use crate::services::store::AvailabilityStore;
use crate::services::validation::{validate_create_availability, validate_update_availability};

pub struct AvailabilityService {
    store: Arc<dyn AvailabilityStore>,
    locks: Arc<DoctorLocks>,
    clock: Arc<dyn Clock>,
    rules: AvailabilityRules,
    doctors: Option<Arc<dyn DoctorRegistry>>,
}

impl AvailabilityService {
    pub fn new(
        store: Arc<dyn AvailabilityStore>,
        locks: Arc<DoctorLocks>,
        clock: Arc<dyn Clock>,
        rules: AvailabilityRules,
    ) -> Self {
        Self {
            store,
            locks,
            clock,
            rules,
            doctors: None,
        }
    }

    /// Require new windows to belong to a doctor known to `doctors`
    pub fn with_doctor_registry(mut self, doctors: Arc<dyn DoctorRegistry>) -> Self {
        self.doctors = Some(doctors);
        self
    }

    pub fn rules(&self) -> &AvailabilityRules {
        &self.rules
    }

    /// Create availability schedule for a doctor
    pub async fn create_availability(
        &self,
        request: CreateAvailabilityRequest,
    ) -> Result<AvailabilityWindow, AvailabilityError> {
        debug!("Creating availability for doctor: {}", request.doctor_id);

        validate_create_availability(&request, &self.rules)
            .map_err(AvailabilityError::ValidationError)?;
        self.ensure_doctor_exists(request.doctor_id).await?;

        let _guard = self.locks.acquire(request.doctor_id).await;

        self.ensure_no_conflict(
            request.doctor_id,
            &request.day,
            request.start_time,
            request.end_time,
            None,
        )
        .await?;

        let now = self.clock.now();
        let window = self
            .store
            .add(NewAvailabilityWindow {
                doctor_id: request.doctor_id,
                day_of_week: request.day.day_of_week(),
                specific_date: request.day.specific_date(),
                start_time: request.start_time,
                end_time: request.end_time,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(
            "Availability {} created for doctor {} ({} - {})",
            window.id, window.doctor_id, window.start_time, window.end_time
        );
        Ok(window)
    }

    /// Replace the day and time bounds of a window, re-validating conflicts
    pub async fn update_availability(
        &self,
        availability_id: i64,
        request: UpdateAvailabilityRequest,
    ) -> Result<AvailabilityWindow, AvailabilityError> {
        debug!("Updating availability: {}", availability_id);

        validate_update_availability(availability_id, &request, &self.rules)
            .map_err(AvailabilityError::ValidationError)?;

        let doctor_id = self.store.get(availability_id).await?.doctor_id;
        let _guard = self.locks.acquire(doctor_id).await;

        let mut window = self.store.get(availability_id).await?;
        let is_active = request.is_active.unwrap_or(window.is_active);

        if is_active {
            self.ensure_no_conflict(
                doctor_id,
                &request.day,
                request.start_time,
                request.end_time,
                Some(availability_id),
            )
            .await?;
        }

        window.day_of_week = request.day.day_of_week();
        window.specific_date = request.day.specific_date();
        window.start_time = request.start_time;
        window.end_time = request.end_time;
        window.is_active = is_active;
        window.updated_at = self.clock.now();

        let updated = self.store.update(window).await?;
        info!("Availability {} updated", updated.id);
        Ok(updated)
    }

    /// Soft delete: the window stops accepting bookings but is kept on record
    pub async fn deactivate_availability(
        &self,
        availability_id: i64,
    ) -> Result<AvailabilityWindow, AvailabilityError> {
        debug!("Deactivating availability: {}", availability_id);

        if availability_id <= 0 {
            return Err(AvailabilityError::ValidationError(vec![
                "Availability id must be a positive integer".to_string(),
            ]));
        }

        let doctor_id = self.store.get(availability_id).await?.doctor_id;
        let _guard = self.locks.acquire(doctor_id).await;

        let mut window = self.store.get(availability_id).await?;
        if !window.is_active {
            debug!("Availability {} already inactive", availability_id);
            return Ok(window);
        }

        window.is_active = false;
        window.updated_at = self.clock.now();
        let updated = self.store.update(window).await?;
        info!("Availability {} deactivated", availability_id);
        Ok(updated)
    }

    pub async fn get_availability(
        &self,
        availability_id: i64,
    ) -> Result<AvailabilityWindow, AvailabilityError> {
        Ok(self.store.get(availability_id).await?)
    }

    /// Get doctor's availability schedules
    pub async fn get_doctor_availability(
        &self,
        doctor_id: i64,
    ) -> Result<Vec<AvailabilityWindow>, AvailabilityError> {
        debug!("Fetching availability for doctor: {}", doctor_id);
        Ok(self.store.list_by_doctor(doctor_id).await?)
    }

    pub async fn get_doctor_availability_for_day(
        &self,
        doctor_id: i64,
        day_of_week: i32,
    ) -> Result<Vec<AvailabilityWindow>, AvailabilityError> {
        if !(0..=6).contains(&day_of_week) {
            return Err(AvailabilityError::ValidationError(vec![
                "Day of week must be between 0 (Sunday) and 6 (Saturday)".to_string(),
            ]));
        }
        Ok(self.store.list_by_doctor_and_day(doctor_id, day_of_week).await?)
    }

    /// Active windows in effect for the doctor on a calendar date
    pub async fn active_windows_on(
        &self,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilityWindow>, AvailabilityError> {
        let windows = self
            .store
            .list_by_doctor_and_day(doctor_id, weekday_number(date))
            .await?;

        Ok(windows
            .into_iter()
            .filter(|w| w.is_active && w.day().applies_on(date))
            .collect())
    }

    /// Candidate slots on a date, stepping from each window's start
    pub async fn candidate_slots(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        slot_minutes: i64,
    ) -> Result<Vec<AvailableSlot>, AvailabilityError> {
        // No slot can outlast the operating day.
        let longest = (self.rules.closing_time - self.rules.opening_time).num_minutes();
        let step = Some(slot_minutes)
            .filter(|minutes| (1..=longest).contains(minutes))
            .and_then(Duration::try_minutes)
            .ok_or_else(|| {
                AvailabilityError::ValidationError(vec![format!(
                    "Slot length must be between 1 and {} minutes",
                    longest
                )])
            })?;

        let mut slots = Vec::new();

        for window in self.active_windows_on(doctor_id, date).await? {
            let window_end = date.and_time(window.end_time);
            let mut current = date.and_time(window.start_time);

            while let Some(next) = current.checked_add_signed(step) {
                if next > window_end {
                    break;
                }
                slots.push(AvailableSlot {
                    doctor_id,
                    window_id: window.id,
                    start_time: current,
                    end_time: next,
                });
                current = next;
            }
        }

        slots.sort_by_key(|slot| slot.start_time);
        Ok(slots)
    }

    async fn ensure_doctor_exists(&self, doctor_id: i64) -> Result<(), AvailabilityError> {
        let Some(doctors) = &self.doctors else {
            return Ok(());
        };

        let exists = doctors.doctor_exists(doctor_id).await.map_err(|e| {
            AvailabilityError::DatabaseError(format!("Doctor lookup failed: {}", e))
        })?;
        if !exists {
            warn!("Availability requested for unknown doctor {}", doctor_id);
            return Err(AvailabilityError::DoctorNotFound(doctor_id));
        }
        Ok(())
    }

    async fn ensure_no_conflict(
        &self,
        doctor_id: i64,
        day: &WindowDay,
        start_time: NaiveTime,
        end_time: NaiveTime,
        exclude_id: Option<i64>,
    ) -> Result<(), AvailabilityError> {
        let existing = self
            .store
            .list_by_doctor_and_day(doctor_id, day.day_of_week())
            .await?;

        if let Some(conflict) =
            find_window_conflict(&existing, doctor_id, day, start_time, end_time, exclude_id)
        {
            warn!(
                "Availability for doctor {} conflicts with window {}",
                doctor_id, conflict.id
            );
            return Err(AvailabilityError::Conflict {
                existing_id: conflict.id,
                start: conflict.start_time,
                end: conflict.end_time,
            });
        }

        Ok(())
    }
}
