use std::sync::Arc;

use anyhow::{anyhow, Context};
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::info;

use appointment_cell::models::{BookAppointmentRequest, Patient};
use appointment_cell::services::{
    spawn_notification, AppointmentEvent, InMemoryDirectory, Notifier, SchedulingService,
};
use doctor_cell::models::{weekday_number, CreateAvailabilityRequest, Doctor, WindowDay};
use shared_models::response::ServiceResponse;

const DOCTOR_ID: i64 = 5;
const PATIENT_ID: i64 = 10;
const SECOND_PATIENT_ID: i64 = 11;
const MONDAY: i32 = 1;

pub async fn seed_directory(directory: &InMemoryDirectory) {
    directory
        .register_doctor(Doctor {
            id: DOCTOR_ID,
            specialty_id: 1,
            is_active: true,
            display_name: "Dr. Amara Osei".to_string(),
        })
        .await;

    for (id, name) in [(PATIENT_ID, "Kofi Mensah"), (SECOND_PATIENT_ID, "Ines Duarte")] {
        directory
            .register_patient(Patient {
                id,
                display_name: name.to_string(),
            })
            .await;
    }
}

/// Walk one appointment through its lifecycle and print every response.
/// Returns the notification tasks spawned along the way.
pub async fn run(
    service: &SchedulingService,
    notifier: Arc<dyn Notifier>,
    today: NaiveDate,
) -> anyhow::Result<Vec<JoinHandle<()>>> {
    let mut deliveries = Vec::new();
    let monday = next_weekday(today, MONDAY);
    info!("Running demo booking flow for {}", monday);

    let window = service
        .create_availability(CreateAvailabilityRequest {
            doctor_id: DOCTOR_ID,
            day: WindowDay::Weekly(MONDAY),
            start_time: clock_time(9, 0)?,
            end_time: clock_time(17, 0)?,
        })
        .await;
    print_response("create_availability", &window)?;

    let ten = monday
        .and_hms_opt(10, 0, 0)
        .ok_or_else(|| anyhow!("invalid demo instant"))?;

    let booked = service
        .create_appointment(BookAppointmentRequest {
            patient_id: PATIENT_ID,
            doctor_id: DOCTOR_ID,
            appointment_date: ten,
            patient_notes: Some("Annual check-up".to_string()),
        })
        .await;
    print_response("create_appointment", &booked)?;
    let appointment = booked
        .data
        .ok_or_else(|| anyhow!("demo booking was rejected"))?;
    deliveries.push(spawn_notification(
        Arc::clone(&notifier),
        AppointmentEvent::Booked {
            appointment: appointment.clone(),
        },
    ));

    let double = service
        .create_appointment(BookAppointmentRequest {
            patient_id: SECOND_PATIENT_ID,
            doctor_id: DOCTOR_ID,
            appointment_date: ten,
            patient_notes: None,
        })
        .await;
    print_response("create_appointment (same slot)", &double)?;

    let confirmed = service.confirm_appointment(appointment.id).await;
    print_response("confirm_appointment", &confirmed)?;
    if let Some(appointment) = confirmed.data {
        deliveries.push(spawn_notification(
            Arc::clone(&notifier),
            AppointmentEvent::Confirmed { appointment },
        ));
    }

    let rescheduled = service
        .reschedule_appointment(appointment.id, ten + Duration::hours(1))
        .await;
    print_response("reschedule_appointment", &rescheduled)?;
    if let Some(moved) = rescheduled.data {
        deliveries.push(spawn_notification(
            Arc::clone(&notifier),
            AppointmentEvent::Rescheduled {
                appointment: moved,
                previous_date: appointment.appointment_date,
            },
        ));
    }

    let slots = service.get_available_slots(DOCTOR_ID, monday, Some(60)).await;
    print_response("get_available_slots", &slots)?;

    let details = service.get_appointment_details(appointment.id).await;
    print_response("get_appointment_details", &details)?;

    Ok(deliveries)
}

/// The first date strictly after `today` falling on `weekday` (0 = Sunday).
fn next_weekday(today: NaiveDate, weekday: i32) -> NaiveDate {
    let ahead = (weekday - weekday_number(today)).rem_euclid(7);
    let ahead = if ahead == 0 { 7 } else { ahead };
    today + Duration::days(i64::from(ahead))
}

fn clock_time(hour: u32, minute: u32) -> anyhow::Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| anyhow!("invalid clock time {hour}:{minute}"))
}

fn print_response<T: Serialize>(operation: &str, response: &ServiceResponse<T>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .with_context(|| format!("failed to serialize {} response", operation))?;
    println!("== {} ==\n{}", operation, json);
    Ok(())
}
