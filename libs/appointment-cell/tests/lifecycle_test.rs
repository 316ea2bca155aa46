// libs/appointment-cell/tests/lifecycle_test.rs
use assert_matches::assert_matches;
use chrono::Duration;

use appointment_cell::models::{
    AppointmentError, AppointmentStatus, AppointmentValidationRules, BookAppointmentRequest,
};
use appointment_cell::services::AppointmentLifecycleService;
use shared_utils::test_utils::at;

const ALL: [AppointmentStatus; 4] = [
    AppointmentStatus::Pending,
    AppointmentStatus::Confirmed,
    AppointmentStatus::Cancelled,
    AppointmentStatus::Completed,
];

#[test]
fn test_transition_table() {
    let lifecycle = AppointmentLifecycleService::new();
    let allowed = [
        (AppointmentStatus::Pending, AppointmentStatus::Confirmed),
        (AppointmentStatus::Pending, AppointmentStatus::Cancelled),
        (AppointmentStatus::Confirmed, AppointmentStatus::Cancelled),
        (AppointmentStatus::Confirmed, AppointmentStatus::Completed),
    ];

    for from in ALL {
        for to in ALL {
            let result = lifecycle.validate_status_transition(from, to);
            if allowed.contains(&(from, to)) {
                assert!(result.is_ok(), "{from} -> {to} should be allowed");
            } else {
                assert_matches!(
                    result,
                    Err(AppointmentError::InvalidStatusTransition { .. }),
                    "{from} -> {to} should be rejected"
                );
            }
        }
    }
}

#[test]
fn test_reschedule_allowed_only_before_terminal_state() {
    let lifecycle = AppointmentLifecycleService::new();

    assert!(lifecycle.validate_reschedule(AppointmentStatus::Pending).is_ok());
    assert!(lifecycle.validate_reschedule(AppointmentStatus::Confirmed).is_ok());
    assert_matches!(
        lifecycle.validate_reschedule(AppointmentStatus::Completed),
        Err(AppointmentError::TerminalStatus(AppointmentStatus::Completed))
    );
}

#[test]
fn test_status_codes_round_trip_through_i32() {
    for status in ALL {
        assert_eq!(AppointmentStatus::try_from(status.code()), Ok(status));
    }
    assert_eq!(AppointmentStatus::Pending.code(), 1);
    assert_eq!(AppointmentStatus::Completed.code(), 4);
    assert_matches!(AppointmentStatus::try_from(9), Err(AppointmentError::ValidationError(_)));
}

#[test]
fn test_only_cancelled_releases_the_slot() {
    assert!(AppointmentStatus::Pending.is_active());
    assert!(AppointmentStatus::Completed.is_active());
    assert!(!AppointmentStatus::Cancelled.is_active());
}

#[test]
fn test_timing_respects_configured_tolerance() {
    let lifecycle = AppointmentLifecycleService::new();
    let now = at(2025, 6, 9, 12, 0);
    let rules = AppointmentValidationRules {
        past_tolerance_minutes: 15,
        ..AppointmentValidationRules::default()
    };

    assert!(lifecycle
        .validate_appointment_timing(now - Duration::minutes(15), now, &rules)
        .is_ok());
    assert_eq!(
        lifecycle.validate_appointment_timing(now - Duration::minutes(16), now, &rules),
        Err("Appointment date must not be more than 15 minutes in the past".to_string())
    );
}

#[test]
fn test_booking_request_collects_every_problem() {
    let lifecycle = AppointmentLifecycleService::new();
    let now = at(2025, 6, 9, 12, 0);
    let request = BookAppointmentRequest {
        patient_id: 0,
        doctor_id: 0,
        appointment_date: at(2025, 6, 1, 12, 0),
        patient_notes: None,
    };

    let result =
        lifecycle.validate_booking_request(&request, now, &AppointmentValidationRules::default());

    assert_matches!(result, Err(AppointmentError::ValidationError(errors)) => {
        assert_eq!(errors.len(), 3);
    });
}
