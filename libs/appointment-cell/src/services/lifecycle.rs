// libs/appointment-cell/src/services/lifecycle.rs
use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::models::{AppointmentError, AppointmentStatus, AppointmentValidationRules, BookAppointmentRequest};

#[derive(Debug, Default, Clone, Copy)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition from {:?} to {:?}", current_status, new_status);

        if !self.get_valid_transitions(current_status).contains(&new_status) {
            warn!("Invalid status transition attempted: {:?} -> {:?}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition {
                from: current_status,
                to: new_status,
            });
        }

        info!("Status transition validated: {:?} -> {:?}", current_status, new_status);
        Ok(())
    }

    /// Get all valid next statuses for a given current status
    pub fn get_valid_transitions(&self, current_status: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Pending => vec![
                AppointmentStatus::Confirmed,
                AppointmentStatus::Cancelled,
            ],
            AppointmentStatus::Confirmed => vec![
                AppointmentStatus::Cancelled,
                AppointmentStatus::Completed,
            ],
            // Terminal states - no transitions allowed
            AppointmentStatus::Cancelled => vec![],
            AppointmentStatus::Completed => vec![],
        }
    }

    /// Rescheduling keeps the status but is refused once terminal
    pub fn validate_reschedule(&self, current_status: AppointmentStatus) -> Result<(), AppointmentError> {
        if current_status.is_terminal() {
            warn!("Reschedule attempted on {:?} appointment", current_status);
            return Err(AppointmentError::TerminalStatus(current_status));
        }
        Ok(())
    }

    /// An instant may lie at most `past_tolerance_minutes` behind `current_time`
    pub fn validate_appointment_timing(
        &self,
        appointment_date: NaiveDateTime,
        current_time: NaiveDateTime,
        rules: &AppointmentValidationRules,
    ) -> Result<(), String> {
        let earliest = Duration::try_minutes(rules.past_tolerance_minutes)
            .and_then(|tolerance| current_time.checked_sub_signed(tolerance));

        match earliest {
            Some(earliest) if appointment_date < earliest => Err(format!(
                "Appointment date must not be more than {} minutes in the past",
                rules.past_tolerance_minutes
            )),
            Some(_) => Ok(()),
            // Only a negative tolerance can push the bound past the calendar's end.
            None if rules.past_tolerance_minutes < 0 => Err(format!(
                "Past tolerance of {} minutes is out of range",
                rules.past_tolerance_minutes
            )),
            None => Ok(()),
        }
    }

    /// Field checks for a booking. All problems are collected.
    pub fn validate_booking_request(
        &self,
        request: &BookAppointmentRequest,
        current_time: NaiveDateTime,
        rules: &AppointmentValidationRules,
    ) -> Result<(), AppointmentError> {
        let mut errors = Vec::new();

        if request.patient_id <= 0 {
            errors.push("Patient id must be a positive integer".to_string());
        }
        if request.doctor_id <= 0 {
            errors.push("Doctor id must be a positive integer".to_string());
        }
        if let Err(e) = self.validate_appointment_timing(request.appointment_date, current_time, rules) {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppointmentError::ValidationError(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_have_no_exits() {
        let lifecycle = AppointmentLifecycleService::new();
        assert!(lifecycle.get_valid_transitions(AppointmentStatus::Cancelled).is_empty());
        assert!(lifecycle.get_valid_transitions(AppointmentStatus::Completed).is_empty());
    }

    #[test]
    fn unbounded_tolerance_never_panics() {
        let lifecycle = AppointmentLifecycleService::new();
        let now = chrono::NaiveDate::from_ymd_opt(2025, 6, 9)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();

        for (tolerance, accepted) in [
            (i64::MAX, true),
            (i64::MIN, false),
            (-600_000_000_000, false),
        ] {
            let rules = AppointmentValidationRules {
                past_tolerance_minutes: tolerance,
                ..AppointmentValidationRules::default()
            };
            assert_eq!(
                lifecycle.validate_appointment_timing(now, now, &rules).is_ok(),
                accepted,
                "tolerance {tolerance}"
            );
        }
    }
}
