// libs/doctor-cell/tests/conflict_test.rs
use chrono::NaiveTime;

use doctor_cell::models::{AvailabilityWindow, WindowDay};
use doctor_cell::services::conflict::{find_window_conflict, intervals_overlap, window_conflict};
use shared_utils::test_utils::{at, date, hm};

fn window(id: i64, doctor_id: i64, day: WindowDay, start: NaiveTime, end: NaiveTime) -> AvailabilityWindow {
    AvailabilityWindow {
        id,
        doctor_id,
        day_of_week: day.day_of_week(),
        specific_date: day.specific_date(),
        start_time: start,
        end_time: end,
        is_active: true,
        created_at: at(2025, 6, 1, 8, 0),
        updated_at: at(2025, 6, 1, 8, 0),
    }
}

#[test]
fn test_overlap_matches_interval_intersection_for_all_hour_pairs() {
    // Every pair of whole-hour intervals inside the operating range.
    let bounds: Vec<u32> = (7..=19).collect();
    for &s1 in &bounds {
        for &e1 in bounds.iter().filter(|&&e| e > s1) {
            for &s2 in &bounds {
                for &e2 in bounds.iter().filter(|&&e| e > s2) {
                    let expected = (s1..e1).any(|h| (s2..e2).contains(&h));
                    let existing = [window(1, 5, WindowDay::Weekly(1), hm(s2, 0), hm(e2, 0))];

                    assert_eq!(
                        window_conflict(&existing, 5, &WindowDay::Weekly(1), hm(s1, 0), hm(e1, 0), None),
                        expected,
                        "[{s1}, {e1}) vs [{s2}, {e2})"
                    );
                    assert_eq!(
                        intervals_overlap(s1, e1, s2, e2),
                        intervals_overlap(s2, e2, s1, e1),
                        "overlap must be symmetric"
                    );
                }
            }
        }
    }
}

#[test]
fn test_touching_boundaries_do_not_conflict() {
    let existing = [window(1, 5, WindowDay::Weekly(1), hm(9, 0), hm(10, 0))];

    assert!(!window_conflict(&existing, 5, &WindowDay::Weekly(1), hm(10, 0), hm(11, 0), None));
    assert!(!window_conflict(&existing, 5, &WindowDay::Weekly(1), hm(8, 0), hm(9, 0), None));
    assert!(window_conflict(&existing, 5, &WindowDay::Weekly(1), hm(9, 59), hm(11, 0), None));
}

#[test]
fn test_excluded_inactive_and_foreign_windows_are_ignored() {
    let mut inactive = window(2, 5, WindowDay::Weekly(1), hm(9, 0), hm(12, 0));
    inactive.is_active = false;
    let existing = [
        window(1, 5, WindowDay::Weekly(1), hm(9, 0), hm(12, 0)),
        inactive,
        window(3, 6, WindowDay::Weekly(1), hm(9, 0), hm(12, 0)),
    ];

    let found = find_window_conflict(&existing, 5, &WindowDay::Weekly(1), hm(10, 0), hm(11, 0), None);
    assert_eq!(found.map(|w| w.id), Some(1));

    assert!(!window_conflict(&existing, 5, &WindowDay::Weekly(1), hm(10, 0), hm(11, 0), Some(1)));
    assert!(!window_conflict(&existing, 7, &WindowDay::Weekly(1), hm(10, 0), hm(11, 0), None));
}

#[test]
fn test_day_matching_between_weekly_and_dated_windows() {
    let monday = date(2025, 6, 9);
    let next_monday = date(2025, 6, 16);
    let existing = [window(1, 5, WindowDay::Date(monday), hm(9, 0), hm(12, 0))];

    assert!(window_conflict(&existing, 5, &WindowDay::Weekly(1), hm(10, 0), hm(11, 0), None));
    assert!(window_conflict(&existing, 5, &WindowDay::Date(monday), hm(10, 0), hm(11, 0), None));
    assert!(!window_conflict(&existing, 5, &WindowDay::Date(next_monday), hm(10, 0), hm(11, 0), None));
    assert!(!window_conflict(&existing, 5, &WindowDay::Weekly(2), hm(10, 0), hm(11, 0), None));
}

#[test]
fn test_window_covers_half_open_range_on_matching_dates() {
    let w = window(1, 5, WindowDay::Weekly(2), hm(9, 0), hm(17, 0));

    assert!(w.covers(at(2025, 6, 10, 9, 0)));
    assert!(w.covers(at(2025, 6, 10, 16, 59)));
    assert!(!w.covers(at(2025, 6, 10, 17, 0)));
    assert!(!w.covers(at(2025, 6, 9, 10, 0)));
}
