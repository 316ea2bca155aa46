// libs/appointment-cell/tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDateTime;

use appointment_cell::models::{BookAppointmentRequest, Patient};
use appointment_cell::services::{InMemoryDirectory, SchedulingService};
use doctor_cell::models::{CreateAvailabilityRequest, Doctor, WindowDay};
use shared_utils::test_utils::{hm, TestConfig};
use shared_utils::FixedClock;

pub const DOCTOR: i64 = 5;
pub const OTHER_DOCTOR: i64 = 6;
pub const INACTIVE_DOCTOR: i64 = 7;
pub const PATIENT: i64 = 10;
pub const OTHER_PATIENT: i64 = 11;

pub const MONDAY: i32 = 1;
pub const TUESDAY: i32 = 2;

pub struct TestSetup {
    pub service: SchedulingService,
    pub clock: Arc<FixedClock>,
    pub directory: Arc<InMemoryDirectory>,
}

impl TestSetup {
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Bookings are not tied to availability windows
    pub async fn loose() -> Self {
        Self::with_config(TestConfig::loose()).await
    }

    pub async fn with_config(config: TestConfig) -> Self {
        let directory = Arc::new(seeded_directory().await);
        let clock = config.clock();
        let service =
            SchedulingService::in_memory(&config.to_app_config(), directory.clone(), clock.clone());
        Self {
            service,
            clock,
            directory,
        }
    }

    /// Create a weekly window and return its id
    pub async fn weekly_window(&self, doctor_id: i64, day: i32, start: (u32, u32), end: (u32, u32)) -> i64 {
        let response = self
            .service
            .create_availability(CreateAvailabilityRequest {
                doctor_id,
                day: WindowDay::Weekly(day),
                start_time: hm(start.0, start.1),
                end_time: hm(end.0, end.1),
            })
            .await;
        assert!(response.success, "window setup failed: {:?}", response.errors);
        response.data.map(|w| w.id).unwrap_or_default()
    }

    /// Book and return the new appointment id
    pub async fn book(&self, patient_id: i64, doctor_id: i64, when: NaiveDateTime) -> i64 {
        let response = self.service.create_appointment(booking(patient_id, doctor_id, when)).await;
        assert!(response.success, "booking setup failed: {:?}", response.errors);
        response.data.map(|a| a.id).unwrap_or_default()
    }
}

pub fn booking(patient_id: i64, doctor_id: i64, when: NaiveDateTime) -> BookAppointmentRequest {
    BookAppointmentRequest {
        patient_id,
        doctor_id,
        appointment_date: when,
        patient_notes: None,
    }
}

pub fn doctor(id: i64, name: &str, is_active: bool) -> Doctor {
    Doctor {
        id,
        specialty_id: 1,
        is_active,
        display_name: name.to_string(),
    }
}

pub async fn seeded_directory() -> InMemoryDirectory {
    let directory = InMemoryDirectory::new();
    directory.register_doctor(doctor(DOCTOR, "Dr. Amara Osei", true)).await;
    directory.register_doctor(doctor(OTHER_DOCTOR, "Dr. Lena Fischer", true)).await;
    directory.register_doctor(doctor(INACTIVE_DOCTOR, "Dr. Retired", false)).await;
    for (id, name) in [(PATIENT, "Kofi Mensah"), (OTHER_PATIENT, "Ines Duarte")] {
        directory
            .register_patient(Patient {
                id,
                display_name: name.to_string(),
            })
            .await;
    }
    directory
}
