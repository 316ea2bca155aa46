// libs/appointment-cell/src/services/scheduling.rs
//
// Entry point for callers of the scheduling core. Every operation returns a
// ServiceResponse; failures never escape as panics or raw store errors.
//

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{error, instrument, warn};

use doctor_cell::models::{
    AvailabilityRules, AvailabilityWindow, AvailableSlot, CreateAvailabilityRequest,
    UpdateAvailabilityRequest,
};
use doctor_cell::services::{AvailabilityService, AvailabilityStore, InMemoryAvailabilityStore};
use shared_config::AppConfig;
use shared_models::error::{AppError, ErrorKind};
use shared_models::response::ServiceResponse;
use shared_utils::{Clock, DoctorLocks};

use crate::models::{
    Appointment, AppointmentDetails, AppointmentError, AppointmentStatus,
    AppointmentValidationRules, BookAppointmentRequest, RescheduleAppointmentRequest,
};
use crate::services::booking::AppointmentBookingService;
use crate::services::conflict::ConflictDetectionService;
use crate::services::directory::{DirectoryDoctors, DirectoryService};
use crate::services::store::{AppointmentStore, InMemoryAppointmentStore};

pub struct SchedulingService {
    availability_service: Arc<AvailabilityService>,
    booking_service: AppointmentBookingService,
}

impl SchedulingService {
    pub fn new(
        config: &AppConfig,
        availability_store: Arc<dyn AvailabilityStore>,
        appointment_store: Arc<dyn AppointmentStore>,
        directory: Arc<dyn DirectoryService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let locks = Arc::new(DoctorLocks::new());

        let availability_service = Arc::new(
            AvailabilityService::new(
                Arc::clone(&availability_store),
                Arc::clone(&locks),
                Arc::clone(&clock),
                AvailabilityRules::from_config(config),
            )
            .with_doctor_registry(Arc::new(DirectoryDoctors(Arc::clone(&directory)))),
        );
        let conflict_service =
            ConflictDetectionService::new(Arc::clone(&appointment_store), availability_store);
        let booking_service = AppointmentBookingService::new(
            appointment_store,
            conflict_service,
            Arc::clone(&availability_service),
            directory,
            locks,
            clock,
            AppointmentValidationRules::from_config(config),
        );

        Self {
            availability_service,
            booking_service,
        }
    }

    /// Wire the core over the in-process stores
    pub fn in_memory(
        config: &AppConfig,
        directory: Arc<dyn DirectoryService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryAvailabilityStore::new()),
            Arc::new(InMemoryAppointmentStore::new(Arc::clone(&clock))),
            directory,
            clock,
        )
    }

    pub fn booking(&self) -> &AppointmentBookingService {
        &self.booking_service
    }

    // ==============================================================================
    // AVAILABILITY OPERATIONS
    // ==============================================================================

    #[instrument(skip(self))]
    pub async fn create_availability(
        &self,
        request: CreateAvailabilityRequest,
    ) -> ServiceResponse<AvailabilityWindow> {
        let result = self
            .availability_service
            .create_availability(request)
            .await
            .map_err(AppError::from);

        respond("create_availability", result, "Availability created")
    }

    #[instrument(skip(self))]
    pub async fn update_availability(
        &self,
        availability_id: i64,
        request: UpdateAvailabilityRequest,
    ) -> ServiceResponse<AvailabilityWindow> {
        let result = self
            .availability_service
            .update_availability(availability_id, request)
            .await
            .map_err(AppError::from);

        respond("update_availability", result, "Availability updated")
    }

    /// Soft delete
    #[instrument(skip(self))]
    pub async fn delete_availability(&self, availability_id: i64) -> ServiceResponse<AvailabilityWindow> {
        let result = self
            .availability_service
            .deactivate_availability(availability_id)
            .await
            .map_err(AppError::from);

        respond("delete_availability", result, "Availability deactivated")
    }

    pub async fn get_availability(&self, availability_id: i64) -> ServiceResponse<AvailabilityWindow> {
        let result = self
            .availability_service
            .get_availability(availability_id)
            .await
            .map_err(AppError::from);

        respond("get_availability", result, "Availability retrieved")
    }

    pub async fn get_doctor_availability(&self, doctor_id: i64) -> ServiceResponse<Vec<AvailabilityWindow>> {
        let result = self
            .availability_service
            .get_doctor_availability(doctor_id)
            .await
            .map_err(AppError::from);

        respond("get_doctor_availability", result, "Availability retrieved")
    }

    pub async fn get_doctor_availability_for_day(
        &self,
        doctor_id: i64,
        day_of_week: i32,
    ) -> ServiceResponse<Vec<AvailabilityWindow>> {
        let result = self
            .availability_service
            .get_doctor_availability_for_day(doctor_id, day_of_week)
            .await
            .map_err(AppError::from);

        respond("get_doctor_availability_for_day", result, "Availability retrieved")
    }

    // ==============================================================================
    // APPOINTMENT OPERATIONS
    // ==============================================================================

    #[instrument(skip(self))]
    pub async fn create_appointment(&self, request: BookAppointmentRequest) -> ServiceResponse<Appointment> {
        let result = self.booking_service.book_appointment(request).await;
        respond_appointment("create_appointment", result, "Appointment booked")
    }

    #[instrument(skip(self))]
    pub async fn confirm_appointment(&self, appointment_id: i64) -> ServiceResponse<Appointment> {
        let result = self.booking_service.confirm_appointment(appointment_id).await;
        respond_appointment("confirm_appointment", result, "Appointment confirmed")
    }

    #[instrument(skip(self))]
    pub async fn cancel_appointment(&self, appointment_id: i64) -> ServiceResponse<Appointment> {
        let result = self.booking_service.cancel_appointment(appointment_id).await;
        respond_appointment("cancel_appointment", result, "Appointment cancelled")
    }

    #[instrument(skip(self))]
    pub async fn complete_appointment(&self, appointment_id: i64) -> ServiceResponse<Appointment> {
        let result = self.booking_service.complete_appointment(appointment_id).await;
        respond_appointment("complete_appointment", result, "Appointment completed")
    }

    #[instrument(skip(self))]
    pub async fn reschedule_appointment(
        &self,
        appointment_id: i64,
        new_appointment_date: NaiveDateTime,
    ) -> ServiceResponse<Appointment> {
        let result = self
            .booking_service
            .reschedule_appointment(
                appointment_id,
                RescheduleAppointmentRequest { new_appointment_date },
            )
            .await;
        respond_appointment("reschedule_appointment", result, "Appointment rescheduled")
    }

    pub async fn get_appointment(&self, appointment_id: i64) -> ServiceResponse<Appointment> {
        let result = self.booking_service.get_appointment(appointment_id).await;
        respond_appointment("get_appointment", result, "Appointment retrieved")
    }

    pub async fn get_appointment_details(&self, appointment_id: i64) -> ServiceResponse<AppointmentDetails> {
        let result = self.booking_service.get_appointment_details(appointment_id).await;
        respond_appointment("get_appointment_details", result, "Appointment retrieved")
    }

    pub async fn get_doctor_appointments(&self, doctor_id: i64) -> ServiceResponse<Vec<Appointment>> {
        let result = self.booking_service.get_doctor_appointments(doctor_id).await;
        respond_appointment("get_doctor_appointments", result, "Appointments retrieved")
    }

    pub async fn get_patient_appointments(&self, patient_id: i64) -> ServiceResponse<Vec<Appointment>> {
        let result = self.booking_service.get_patient_appointments(patient_id).await;
        respond_appointment("get_patient_appointments", result, "Appointments retrieved")
    }

    pub async fn get_appointments_by_status(
        &self,
        status: AppointmentStatus,
    ) -> ServiceResponse<Vec<Appointment>> {
        let result = self.booking_service.get_appointments_by_status(status).await;
        respond_appointment("get_appointments_by_status", result, "Appointments retrieved")
    }

    pub async fn get_appointments_in_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ServiceResponse<Vec<Appointment>> {
        let result = self.booking_service.get_appointments_in_range(start, end).await;
        respond_appointment("get_appointments_in_range", result, "Appointments retrieved")
    }

    pub async fn get_available_slots(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        slot_minutes: Option<i64>,
    ) -> ServiceResponse<Vec<AvailableSlot>> {
        let result = self
            .booking_service
            .get_available_slots(doctor_id, date, slot_minutes)
            .await;
        respond_appointment("get_available_slots", result, "Available slots retrieved")
    }

    pub fn valid_transitions(&self, status: AppointmentStatus) -> Vec<AppointmentStatus> {
        self.booking_service.lifecycle().get_valid_transitions(status)
    }
}

fn respond_appointment<T>(
    operation: &str,
    result: Result<T, AppointmentError>,
    message: &str,
) -> ServiceResponse<T> {
    respond(operation, result.map_err(AppError::from), message)
}

/// Translate an outcome into the uniform response, logging by severity
fn respond<T>(operation: &str, result: Result<T, AppError>, message: &str) -> ServiceResponse<T> {
    if let Err(e) = &result {
        match e.kind() {
            ErrorKind::Internal => error!(operation, error = %e, "Scheduling operation failed"),
            ErrorKind::Conflict => warn!(operation, error = %e, "Scheduling conflict"),
            ErrorKind::Validation | ErrorKind::NotFound => {
                warn!(operation, error = %e, "Scheduling request rejected")
            }
        }
    }
    ServiceResponse::from_result(result, message)
}
