// libs/appointment-cell/src/services/store.rs
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::RwLock;

use shared_models::error::StoreError;
use shared_utils::Clock;

use crate::models::{Appointment, AppointmentDetails, AppointmentStatus, NewAppointment};
use crate::services::conflict::find_appointment_collision;

const ENTITY: &str = "Appointment";

/// Persistence contract for appointments.
///
/// `add` assigns the id, starts the appointment in `Pending` and stamps
/// `created_at`. `update` replaces a whole existing record. Listings are
/// ordered by appointment date.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn get(&self, id: i64) -> Result<Appointment, StoreError>;

    /// Projection carrying status display data. Name enrichment is left to
    /// callers that know the directory.
    async fn get_with_details(&self, id: i64) -> Result<AppointmentDetails, StoreError> {
        Ok(AppointmentDetails::from_appointment(self.get(id).await?))
    }

    async fn list_by_doctor(&self, doctor_id: i64) -> Result<Vec<Appointment>, StoreError>;
    async fn list_by_patient(&self, patient_id: i64) -> Result<Vec<Appointment>, StoreError>;
    async fn list_by_status(&self, status: AppointmentStatus) -> Result<Vec<Appointment>, StoreError>;

    /// Appointments dated within `[start, end)`.
    async fn list_by_date_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn add(&self, appointment: NewAppointment) -> Result<Appointment, StoreError>;
    async fn update(&self, appointment: Appointment) -> Result<Appointment, StoreError>;
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Whether an active appointment other than `exclude_id` holds the instant.
    async fn exists_in_time_slot(
        &self,
        doctor_id: i64,
        instant: NaiveDateTime,
        exclude_id: Option<i64>,
    ) -> Result<bool, StoreError>;
}

/// In-process store. Rejects a second active appointment for the same
/// doctor and instant with `UniqueViolation`, like a unique index would.
pub struct InMemoryAppointmentStore {
    appointments: RwLock<HashMap<i64, Appointment>>,
    next_id: AtomicI64,
    clock: Arc<dyn Clock>,
}

impl InMemoryAppointmentStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            appointments: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(0),
            clock,
        }
    }

    async fn filtered<F>(&self, predicate: F) -> Vec<Appointment>
    where
        F: Fn(&Appointment) -> bool,
    {
        let appointments = self.appointments.read().await;
        let mut matching: Vec<Appointment> =
            appointments.values().filter(|a| predicate(a)).cloned().collect();
        matching.sort_by_key(|a| (a.appointment_date, a.id));
        matching
    }

    fn slot_taken(doctor_id: i64, instant: NaiveDateTime) -> StoreError {
        StoreError::UniqueViolation(format!(
            "doctor {} already has an active appointment at {}",
            doctor_id, instant
        ))
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn get(&self, id: i64) -> Result<Appointment, StoreError> {
        self.appointments
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: ENTITY, id })
    }

    async fn list_by_doctor(&self, doctor_id: i64) -> Result<Vec<Appointment>, StoreError> {
        Ok(self.filtered(|a| a.doctor_id == doctor_id).await)
    }

    async fn list_by_patient(&self, patient_id: i64) -> Result<Vec<Appointment>, StoreError> {
        Ok(self.filtered(|a| a.patient_id == patient_id).await)
    }

    async fn list_by_status(&self, status: AppointmentStatus) -> Result<Vec<Appointment>, StoreError> {
        Ok(self.filtered(|a| a.status == status).await)
    }

    async fn list_by_date_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Appointment>, StoreError> {
        Ok(self
            .filtered(|a| start <= a.appointment_date && a.appointment_date < end)
            .await)
    }

    async fn add(&self, appointment: NewAppointment) -> Result<Appointment, StoreError> {
        let mut appointments = self.appointments.write().await;

        if find_appointment_collision(
            appointments.values(),
            appointment.doctor_id,
            appointment.appointment_date,
            None,
        )
        .is_some()
        {
            return Err(Self::slot_taken(appointment.doctor_id, appointment.appointment_date));
        }

        let now = self.clock.now();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let stored = Appointment {
            id,
            patient_id: appointment.patient_id,
            doctor_id: appointment.doctor_id,
            appointment_date: appointment.appointment_date,
            status: AppointmentStatus::Pending,
            notes: appointment.notes,
            created_at: now,
            updated_at: now,
        };
        appointments.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        let mut appointments = self.appointments.write().await;

        if !appointments.contains_key(&appointment.id) {
            return Err(StoreError::NotFound { entity: ENTITY, id: appointment.id });
        }

        let collides = appointment.is_active()
            && find_appointment_collision(
                appointments.values(),
                appointment.doctor_id,
                appointment.appointment_date,
                Some(appointment.id),
            )
            .is_some();
        if collides {
            return Err(Self::slot_taken(appointment.doctor_id, appointment.appointment_date));
        }

        appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.appointments
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { entity: ENTITY, id })
    }

    async fn exists_in_time_slot(
        &self,
        doctor_id: i64,
        instant: NaiveDateTime,
        exclude_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        let appointments = self.appointments.read().await;
        Ok(find_appointment_collision(appointments.values(), doctor_id, instant, exclude_id).is_some())
    }
}
