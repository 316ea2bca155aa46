// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use doctor_cell::models::AvailableSlot;
use doctor_cell::services::AvailabilityService;
use shared_models::error::StoreError;
use shared_utils::{Clock, DoctorLocks};

use crate::models::{
    Appointment, AppointmentDetails, AppointmentError, AppointmentStatus,
    AppointmentValidationRules, BookAppointmentRequest, NewAppointment,
    RescheduleAppointmentRequest,
};
use crate::services::conflict::ConflictDetectionService;
use crate::services::directory::DirectoryService;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::store::AppointmentStore;

pub struct AppointmentBookingService {
    store: Arc<dyn AppointmentStore>,
    conflict_service: ConflictDetectionService,
    lifecycle_service: AppointmentLifecycleService,
    availability_service: Arc<AvailabilityService>,
    directory: Arc<dyn DirectoryService>,
    locks: Arc<DoctorLocks>,
    clock: Arc<dyn Clock>,
    validation_rules: AppointmentValidationRules,
}

impl AppointmentBookingService {
    pub fn new(
        store: Arc<dyn AppointmentStore>,
        conflict_service: ConflictDetectionService,
        availability_service: Arc<AvailabilityService>,
        directory: Arc<dyn DirectoryService>,
        locks: Arc<DoctorLocks>,
        clock: Arc<dyn Clock>,
        validation_rules: AppointmentValidationRules,
    ) -> Self {
        Self {
            store,
            conflict_service,
            lifecycle_service: AppointmentLifecycleService::new(),
            availability_service,
            directory,
            locks,
            clock,
            validation_rules,
        }
    }

    pub fn lifecycle(&self) -> &AppointmentLifecycleService {
        &self.lifecycle_service
    }

    pub fn conflicts(&self) -> &ConflictDetectionService {
        &self.conflict_service
    }

    /// Book an appointment in `Pending` for a patient with a doctor
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking appointment for patient {} with doctor {} at {}",
            request.patient_id, request.doctor_id, request.appointment_date
        );

        // **Step 1: Field validation, before any store access**
        self.lifecycle_service.validate_booking_request(
            &request,
            self.clock.now(),
            &self.validation_rules,
        )?;

        // **Step 2: Referenced identities must exist**
        self.ensure_patient_exists(request.patient_id).await?;
        self.ensure_doctor_exists(request.doctor_id).await?;

        // **Step 3: Check and write inside the doctor's critical section**
        let _guard = self.locks.acquire(request.doctor_id).await;

        self.ensure_slot_free(request.doctor_id, request.appointment_date, None)
            .await?;

        let appointment = self
            .store
            .add(NewAppointment {
                patient_id: request.patient_id,
                doctor_id: request.doctor_id,
                appointment_date: request.appointment_date,
                notes: request.patient_notes,
            })
            .await
            .map_err(|e| Self::slot_error(e, request.doctor_id, request.appointment_date))?;

        info!(
            "Appointment {} booked for doctor {} at {}",
            appointment.id, appointment.doctor_id, appointment.appointment_date
        );
        Ok(appointment)
    }

    /// Pending -> Confirmed. Confirming twice is an error.
    pub async fn confirm_appointment(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        self.transition(appointment_id, AppointmentStatus::Confirmed).await
    }

    /// Pending/Confirmed -> Cancelled. Cancelling a terminal appointment is an error.
    pub async fn cancel_appointment(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        self.transition(appointment_id, AppointmentStatus::Cancelled).await
    }

    /// Confirmed -> Completed.
    pub async fn complete_appointment(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        self.transition(appointment_id, AppointmentStatus::Completed).await
    }

    /// Move an appointment to a new instant without touching its status
    pub async fn reschedule_appointment(
        &self,
        appointment_id: i64,
        request: RescheduleAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Rescheduling appointment {} to {}",
            appointment_id, request.new_appointment_date
        );

        Self::ensure_positive_id(appointment_id)?;
        self.lifecycle_service
            .validate_appointment_timing(
                request.new_appointment_date,
                self.clock.now(),
                &self.validation_rules,
            )
            .map_err(|e| AppointmentError::ValidationError(vec![e]))?;

        let doctor_id = self.store.get(appointment_id).await?.doctor_id;
        let _guard = self.locks.acquire(doctor_id).await;

        let mut appointment = self.store.get(appointment_id).await?;
        self.lifecycle_service.validate_reschedule(appointment.status)?;

        self.ensure_slot_free(doctor_id, request.new_appointment_date, Some(appointment_id))
            .await?;

        let previous_date = appointment.appointment_date;
        appointment.appointment_date = request.new_appointment_date;
        appointment.updated_at = self.clock.now();

        let updated = self
            .store
            .update(appointment)
            .await
            .map_err(|e| Self::slot_error(e, doctor_id, request.new_appointment_date))?;

        info!(
            "Appointment {} rescheduled from {} to {}",
            updated.id, previous_date, updated.appointment_date
        );
        Ok(updated)
    }

    pub async fn get_appointment(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        Ok(self.store.get(appointment_id).await?)
    }

    /// Appointment with status label and doctor/patient display names
    pub async fn get_appointment_details(
        &self,
        appointment_id: i64,
    ) -> Result<AppointmentDetails, AppointmentError> {
        let mut details = self.store.get_with_details(appointment_id).await?;

        details.doctor_name = self
            .directory
            .doctor_name(details.appointment.doctor_id)
            .await
            .map_err(Self::directory_error)?;
        details.patient_name = self
            .directory
            .patient_name(details.appointment.patient_id)
            .await
            .map_err(Self::directory_error)?;

        Ok(details)
    }

    pub async fn get_doctor_appointments(&self, doctor_id: i64) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.store.list_by_doctor(doctor_id).await?)
    }

    pub async fn get_patient_appointments(&self, patient_id: i64) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.store.list_by_patient(patient_id).await?)
    }

    pub async fn get_appointments_by_status(
        &self,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.store.list_by_status(status).await?)
    }

    /// Appointments within `[start, end)`
    pub async fn get_appointments_in_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        if start >= end {
            return Err(AppointmentError::ValidationError(vec![
                "Range start must be before range end".to_string(),
            ]));
        }
        Ok(self.store.list_by_date_range(start, end).await?)
    }

    /// Bookable instants on `date`: window slots not held by an active
    /// appointment and not already in the past
    pub async fn get_available_slots(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        slot_minutes: Option<i64>,
    ) -> Result<Vec<AvailableSlot>, AppointmentError> {
        let slot_minutes = slot_minutes.unwrap_or(self.validation_rules.default_slot_minutes);
        debug!(
            "Listing {}-minute slots for doctor {} on {}",
            slot_minutes, doctor_id, date
        );

        let candidates = self
            .availability_service
            .candidate_slots(doctor_id, date, slot_minutes)
            .await?;

        let now = self.clock.now();
        let mut available = Vec::with_capacity(candidates.len());
        for slot in candidates {
            if slot.start_time < now {
                continue;
            }
            if !self
                .conflict_service
                .appointment_conflict(doctor_id, slot.start_time, None)
                .await?
            {
                available.push(slot);
            }
        }

        Ok(available)
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    async fn transition(
        &self,
        appointment_id: i64,
        target: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Moving appointment {} to {:?}", appointment_id, target);
        Self::ensure_positive_id(appointment_id)?;

        let doctor_id = self.store.get(appointment_id).await?.doctor_id;
        let _guard = self.locks.acquire(doctor_id).await;

        let mut appointment = self.store.get(appointment_id).await?;
        self.lifecycle_service
            .validate_status_transition(appointment.status, target)?;

        appointment.status = target;
        appointment.updated_at = self.clock.now();
        let updated = self.store.update(appointment).await?;

        info!("Appointment {} is now {}", updated.id, updated.status);
        Ok(updated)
    }

    /// Availability linkage (when enabled) and point collision, under the lock
    async fn ensure_slot_free(
        &self,
        doctor_id: i64,
        instant: NaiveDateTime,
        exclude_appointment_id: Option<i64>,
    ) -> Result<(), AppointmentError> {
        if self.validation_rules.require_availability_window
            && self
                .conflict_service
                .covering_window(doctor_id, instant)
                .await?
                .is_none()
        {
            warn!("Doctor {} has no active window covering {}", doctor_id, instant);
            return Err(AppointmentError::DoctorNotAvailable {
                doctor_id,
                appointment_date: instant,
            });
        }

        if self
            .conflict_service
            .appointment_conflict(doctor_id, instant, exclude_appointment_id)
            .await?
        {
            return Err(AppointmentError::ConflictDetected {
                doctor_id,
                appointment_date: instant,
            });
        }

        Ok(())
    }

    async fn ensure_patient_exists(&self, patient_id: i64) -> Result<(), AppointmentError> {
        if !self
            .directory
            .patient_exists(patient_id)
            .await
            .map_err(Self::directory_error)?
        {
            return Err(AppointmentError::PatientNotFound(patient_id));
        }
        Ok(())
    }

    async fn ensure_doctor_exists(&self, doctor_id: i64) -> Result<(), AppointmentError> {
        if !self
            .directory
            .doctor_exists(doctor_id)
            .await
            .map_err(Self::directory_error)?
        {
            return Err(AppointmentError::DoctorNotFound(doctor_id));
        }
        Ok(())
    }

    fn ensure_positive_id(appointment_id: i64) -> Result<(), AppointmentError> {
        if appointment_id <= 0 {
            return Err(AppointmentError::ValidationError(vec![
                "Appointment id must be a positive integer".to_string(),
            ]));
        }
        Ok(())
    }

    /// The store's uniqueness guarantee is authoritative for double booking.
    fn slot_error(err: StoreError, doctor_id: i64, instant: NaiveDateTime) -> AppointmentError {
        match err {
            StoreError::UniqueViolation(_) => AppointmentError::ConflictDetected {
                doctor_id,
                appointment_date: instant,
            },
            other => other.into(),
        }
    }

    fn directory_error(err: StoreError) -> AppointmentError {
        AppointmentError::ExternalServiceError(err.to_string())
    }
}
