use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use shared_config::AppConfig;

use crate::clock::FixedClock;

/// Wall-clock instant, panicking on an impossible date. Test fixtures only.
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap_or_else(|| panic!("invalid fixture instant {year}-{month}-{day} {hour}:{minute}"))
}

pub fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .unwrap_or_else(|| panic!("invalid fixture time {hour}:{minute}"))
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid fixture date {year}-{month}-{day}"))
}

pub struct TestConfig {
    pub now: NaiveDateTime,
    pub require_availability_window: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            // Sunday morning before the fixture week of 2025-06-09.
            now: at(2025, 6, 1, 8, 0),
            require_availability_window: true,
        }
    }
}

impl TestConfig {
    pub fn loose() -> Self {
        Self {
            require_availability_window: false,
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            require_availability_window: self.require_availability_window,
            ..AppConfig::default()
        }
    }

    pub fn clock(&self) -> Arc<FixedClock> {
        Arc::new(FixedClock::new(self.now))
    }
}
