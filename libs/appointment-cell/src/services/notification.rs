// libs/appointment-cell/src/services/notification.rs
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::models::Appointment;

/// Scheduling outcomes a caller may announce after the decision is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AppointmentEvent {
    Booked { appointment: Appointment },
    Confirmed { appointment: Appointment },
    Cancelled { appointment: Appointment },
    Rescheduled {
        appointment: Appointment,
        previous_date: NaiveDateTime,
    },
}

impl AppointmentEvent {
    pub fn appointment(&self) -> &Appointment {
        match self {
            AppointmentEvent::Booked { appointment }
            | AppointmentEvent::Confirmed { appointment }
            | AppointmentEvent::Cancelled { appointment }
            | AppointmentEvent::Rescheduled { appointment, .. } => appointment,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AppointmentEvent::Booked { .. } => "booked",
            AppointmentEvent::Confirmed { .. } => "confirmed",
            AppointmentEvent::Cancelled { .. } => "cancelled",
            AppointmentEvent::Rescheduled { .. } => "rescheduled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Notification delivery failed: {0}")]
pub struct NotificationError(pub String);

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &AppointmentEvent) -> Result<(), NotificationError>;
}

/// Writes every event to the log instead of delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, event: &AppointmentEvent) -> Result<(), NotificationError> {
        let appointment = event.appointment();
        info!(
            event = event.name(),
            appointment_id = appointment.id,
            patient_id = appointment.patient_id,
            doctor_id = appointment.doctor_id,
            "Appointment notification"
        );
        Ok(())
    }
}

/// Fire-and-forget delivery. A failure is logged and never reaches the
/// scheduling decision that triggered it.
pub fn spawn_notification(notifier: Arc<dyn Notifier>, event: AppointmentEvent) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(&event).await {
            warn!(
                event = event.name(),
                appointment_id = event.appointment().id,
                "Failed to deliver appointment notification: {}",
                e
            );
        }
    })
}
