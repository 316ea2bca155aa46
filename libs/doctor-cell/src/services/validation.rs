use chrono::NaiveTime;

use crate::models::{AvailabilityRules, CreateAvailabilityRequest, UpdateAvailabilityRequest, WindowDay};

/// Checks shared by create and update. Every problem is reported.
pub fn validate_window_bounds(
    day: &WindowDay,
    start_time: NaiveTime,
    end_time: NaiveTime,
    rules: &AvailabilityRules,
) -> Vec<String> {
    let mut errors = Vec::new();

    if start_time >= end_time {
        errors.push("Start time must be before end time".to_string());
    }

    if let WindowDay::Weekly(day) = day {
        if !(0..=6).contains(day) {
            errors.push("Day of week must be between 0 (Sunday) and 6 (Saturday)".to_string());
        }
    }

    if start_time < rules.opening_time {
        errors.push(format!(
            "Start time must not be earlier than {}",
            rules.opening_time.format("%H:%M")
        ));
    }

    if end_time > rules.closing_time {
        errors.push(format!(
            "End time must not be later than {}",
            rules.closing_time.format("%H:%M")
        ));
    }

    errors
}

pub fn validate_create_availability(
    request: &CreateAvailabilityRequest,
    rules: &AvailabilityRules,
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    if request.doctor_id <= 0 {
        errors.push("Doctor id must be a positive integer".to_string());
    }
    errors.extend(validate_window_bounds(
        &request.day,
        request.start_time,
        request.end_time,
        rules,
    ));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_update_availability(
    window_id: i64,
    request: &UpdateAvailabilityRequest,
    rules: &AvailabilityRules,
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    if window_id <= 0 {
        errors.push("Availability id must be a positive integer".to_string());
    }
    errors.extend(validate_window_bounds(
        &request.day,
        request.start_time,
        request.end_time,
        rules,
    ));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn accepts_window_touching_operating_bounds() {
        let rules = AvailabilityRules::default();
        let errors = validate_window_bounds(&WindowDay::Weekly(1), t(7, 0), t(19, 0), &rules);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn reports_every_problem_at_once() {
        let rules = AvailabilityRules::default();
        let errors = validate_window_bounds(&WindowDay::Weekly(9), t(6, 0), t(5, 0), &rules);
        assert_eq!(errors.len(), 3, "{errors:?}");
    }

    #[test]
    fn rejects_non_positive_doctor() {
        let request = CreateAvailabilityRequest {
            doctor_id: 0,
            day: WindowDay::Weekly(2),
            start_time: t(9, 0),
            end_time: t(10, 0),
        };
        let errors = validate_create_availability(&request, &AvailabilityRules::default()).unwrap_err();
        assert_eq!(errors, vec!["Doctor id must be a positive integer".to_string()]);
    }
}
