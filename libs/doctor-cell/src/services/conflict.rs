use chrono::NaiveTime;

use crate::models::{AvailabilityWindow, WindowDay};

/// Half-open interval overlap: `[s1, e1)` and `[s2, e2)` intersect.
/// Touching boundaries do not overlap.
pub fn intervals_overlap<T: PartialOrd>(start1: T, end1: T, start2: T, end2: T) -> bool {
    start1 < end2 && start2 < end1
}

/// First other active window of `doctor_id` that overlaps the proposal.
pub fn find_window_conflict<'a>(
    existing: &'a [AvailabilityWindow],
    doctor_id: i64,
    day: &WindowDay,
    start_time: NaiveTime,
    end_time: NaiveTime,
    exclude_window_id: Option<i64>,
) -> Option<&'a AvailabilityWindow> {
    existing.iter().find(|window| {
        window.is_active
            && window.doctor_id == doctor_id
            && Some(window.id) != exclude_window_id
            && window.day().collides_with(day)
            && intervals_overlap(window.start_time, window.end_time, start_time, end_time)
    })
}

pub fn window_conflict(
    existing: &[AvailabilityWindow],
    doctor_id: i64,
    day: &WindowDay,
    start_time: NaiveTime,
    end_time: NaiveTime,
    exclude_window_id: Option<i64>,
) -> bool {
    find_window_conflict(existing, doctor_id, day, start_time, end_time, exclude_window_id).is_some()
}
