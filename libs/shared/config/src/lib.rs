use std::env;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

const DEFAULT_OPENING_TIME: &str = "07:00";
const DEFAULT_CLOSING_TIME: &str = "19:00";
const DEFAULT_PAST_TOLERANCE_MINUTES: i64 = 5;
const DEFAULT_SLOT_MINUTES: i64 = 30;

/// Upper bound for `past_tolerance_minutes` (one day).
pub const MAX_PAST_TOLERANCE_MINUTES: i64 = 24 * 60;
/// Upper bound for `default_slot_minutes` (one day).
pub const MAX_SLOT_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub past_tolerance_minutes: i64,
    pub require_availability_window: bool,
    pub default_slot_minutes: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            opening_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN),
            closing_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap_or(NaiveTime::MIN),
            past_tolerance_minutes: DEFAULT_PAST_TOLERANCE_MINUTES,
            require_availability_window: true,
            default_slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            opening_time: time_var("CLINIC_OPENING_TIME", DEFAULT_OPENING_TIME)
                .unwrap_or(defaults.opening_time),
            closing_time: time_var("CLINIC_CLOSING_TIME", DEFAULT_CLOSING_TIME)
                .unwrap_or(defaults.closing_time),
            past_tolerance_minutes: parsed_var(
                "BOOKING_PAST_TOLERANCE_MINUTES",
                defaults.past_tolerance_minutes,
            ),
            require_availability_window: parsed_var(
                "REQUIRE_AVAILABILITY_WINDOW",
                defaults.require_availability_window,
            ),
            default_slot_minutes: parsed_var("DEFAULT_SLOT_MINUTES", defaults.default_slot_minutes),
        };

        if config.is_consistent() {
            return config;
        }

        warn!(
            "Inconsistent scheduling configuration {:?}, falling back to defaults where needed",
            config
        );
        let mut repaired = config;
        if repaired.opening_time >= repaired.closing_time {
            repaired.opening_time = defaults.opening_time;
            repaired.closing_time = defaults.closing_time;
        }
        if !(0..=MAX_PAST_TOLERANCE_MINUTES).contains(&repaired.past_tolerance_minutes) {
            repaired.past_tolerance_minutes = defaults.past_tolerance_minutes;
        }
        if !(1..=MAX_SLOT_MINUTES).contains(&repaired.default_slot_minutes) {
            repaired.default_slot_minutes = defaults.default_slot_minutes;
        }
        repaired
    }

    /// Opening must precede closing and durations must lie within their bounds.
    pub fn is_consistent(&self) -> bool {
        self.opening_time < self.closing_time
            && (0..=MAX_PAST_TOLERANCE_MINUTES).contains(&self.past_tolerance_minutes)
            && (1..=MAX_SLOT_MINUTES).contains(&self.default_slot_minutes)
    }
}

fn time_var(key: &str, fallback: &str) -> Option<NaiveTime> {
    let raw = env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using default {}", key, fallback);
        fallback.to_string()
    });
    parse_clock_time(&raw).or_else(|| {
        warn!("{} has invalid value {:?}, using default {}", key, raw, fallback);
        None
    })
}

fn parsed_var<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {}", key, raw, default);
            default
        }),
        Err(_) => {
            warn!("{} not set, using default {}", key, default);
            default
        }
    }
}

/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}
