// libs/appointment-cell/tests/conflict_test.rs
mod common;

use std::sync::Arc;

use appointment_cell::models::{AppointmentStatus, NewAppointment};
use appointment_cell::services::{
    AppointmentStore, ConflictDetectionService, InMemoryAppointmentStore,
};
use common::*;
use doctor_cell::models::{CreateAvailabilityRequest, NewAvailabilityWindow, WindowDay};
use doctor_cell::services::{AvailabilityStore, InMemoryAvailabilityStore};
use shared_models::error::{ErrorKind, StoreError};
use shared_utils::test_utils::{at, date, hm, TestConfig};

struct Detector {
    conflicts: ConflictDetectionService,
    appointments: Arc<InMemoryAppointmentStore>,
    windows: Arc<InMemoryAvailabilityStore>,
}

fn detector() -> Detector {
    let appointments = Arc::new(InMemoryAppointmentStore::new(TestConfig::default().clock()));
    let windows = Arc::new(InMemoryAvailabilityStore::new());
    Detector {
        conflicts: ConflictDetectionService::new(appointments.clone(), windows.clone()),
        appointments,
        windows,
    }
}

fn visit(patient_id: i64, doctor_id: i64, hour: u32) -> NewAppointment {
    NewAppointment {
        patient_id,
        doctor_id,
        appointment_date: at(2025, 6, 9, hour, 0),
        notes: None,
    }
}

#[tokio::test]
async fn test_window_conflict_uses_half_open_intervals() {
    let setup = TestSetup::new().await;
    setup.weekly_window(DOCTOR, MONDAY, (9, 0), (12, 0)).await;
    let conflicts = setup.service.booking().conflicts();
    let monday = WindowDay::Weekly(MONDAY);

    assert!(conflicts
        .window_conflict(DOCTOR, &monday, hm(11, 0), hm(13, 0), None)
        .await
        .expect("lookup"));
    assert!(!conflicts
        .window_conflict(DOCTOR, &monday, hm(12, 0), hm(13, 0), None)
        .await
        .expect("lookup"));
    assert!(!conflicts
        .window_conflict(DOCTOR, &WindowDay::Weekly(TUESDAY), hm(9, 0), hm(12, 0), None)
        .await
        .expect("lookup"));
    assert!(!conflicts
        .window_conflict(OTHER_DOCTOR, &monday, hm(9, 0), hm(12, 0), None)
        .await
        .expect("lookup"));
}

#[tokio::test]
async fn test_dated_window_conflicts_with_weekly_window_on_same_weekday() {
    let setup = TestSetup::new().await;
    let weekly = setup.weekly_window(DOCTOR, MONDAY, (9, 0), (12, 0)).await;
    let conflicts = setup.service.booking().conflicts();

    // 2025-06-09 is a Monday, 2025-06-10 a Tuesday.
    assert!(conflicts
        .window_conflict(DOCTOR, &WindowDay::Date(date(2025, 6, 9)), hm(10, 0), hm(11, 0), None)
        .await
        .expect("lookup"));
    assert!(!conflicts
        .window_conflict(DOCTOR, &WindowDay::Date(date(2025, 6, 10)), hm(10, 0), hm(11, 0), None)
        .await
        .expect("lookup"));
    assert!(!conflicts
        .window_conflict(DOCTOR, &WindowDay::Weekly(MONDAY), hm(10, 0), hm(11, 0), Some(weekly))
        .await
        .expect("lookup"));
}

#[tokio::test]
async fn test_dated_window_covers_only_its_date() {
    let setup = TestSetup::new().await;
    let response = setup
        .service
        .create_availability(CreateAvailabilityRequest {
            doctor_id: DOCTOR,
            day: WindowDay::Date(date(2025, 6, 11)),
            start_time: hm(13, 0),
            end_time: hm(15, 0),
        })
        .await;
    assert!(response.success);

    let on_date = setup
        .service
        .create_appointment(booking(PATIENT, DOCTOR, at(2025, 6, 11, 14, 0)))
        .await;
    assert!(on_date.success);

    // Same weekday one week later is not covered.
    let next_week = setup
        .service
        .create_appointment(booking(PATIENT, DOCTOR, at(2025, 6, 18, 14, 0)))
        .await;
    assert!(next_week.is_kind(ErrorKind::Conflict));
}

#[tokio::test]
async fn test_appointment_conflict_ignores_cancelled_and_excluded() {
    let detector = detector();
    let held = detector.appointments.add(visit(PATIENT, DOCTOR, 10)).await.expect("added");
    let instant = held.appointment_date;

    assert!(detector
        .conflicts
        .appointment_conflict(DOCTOR, instant, None)
        .await
        .expect("lookup"));
    assert!(!detector
        .conflicts
        .appointment_conflict(DOCTOR, instant, Some(held.id))
        .await
        .expect("lookup"));
    assert!(!detector
        .conflicts
        .appointment_conflict(OTHER_DOCTOR, instant, None)
        .await
        .expect("lookup"));

    let mut cancelled = held.clone();
    cancelled.status = AppointmentStatus::Cancelled;
    detector.appointments.update(cancelled).await.expect("updated");

    assert!(!detector
        .conflicts
        .appointment_conflict(DOCTOR, instant, None)
        .await
        .expect("lookup"));
}

#[tokio::test]
async fn test_store_rejects_second_active_appointment_for_instant() {
    let detector = detector();
    detector.appointments.add(visit(PATIENT, DOCTOR, 10)).await.expect("added");

    let duplicate = detector.appointments.add(visit(OTHER_PATIENT, DOCTOR, 10)).await;
    assert!(matches!(duplicate, Err(StoreError::UniqueViolation(_))));

    let other_doctor = detector.appointments.add(visit(OTHER_PATIENT, OTHER_DOCTOR, 10)).await;
    assert!(other_doctor.is_ok());
}

#[tokio::test]
async fn test_store_update_requires_existing_record() {
    let detector = detector();
    let mut ghost = detector.appointments.add(visit(PATIENT, DOCTOR, 9)).await.expect("added");
    detector.appointments.delete(ghost.id).await.expect("deleted");

    ghost.notes = Some("edited".to_string());
    let result = detector.appointments.update(ghost.clone()).await;

    assert_eq!(result, Err(StoreError::NotFound { entity: "Appointment", id: ghost.id }));
}

#[tokio::test]
async fn test_covering_window_ignores_inactive_windows() {
    let detector = detector();
    let now = TestConfig::default().now;
    let window = detector
        .windows
        .add(NewAvailabilityWindow {
            doctor_id: DOCTOR,
            day_of_week: MONDAY,
            specific_date: None,
            start_time: hm(9, 0),
            end_time: hm(12, 0),
            is_active: false,
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("added");

    let covering = detector
        .conflicts
        .covering_window(DOCTOR, at(2025, 6, 9, 10, 0))
        .await
        .expect("lookup");

    assert!(!window.is_active);
    assert_eq!(covering, None);
}
