//! Clock-time helpers for block schedules.
//!
//! Blocks carry wall-clock times without a date ("09:30:00"). Arithmetic is done
//! in minutes since midnight so that a block running past midnight still compares
//! as later than everything else in its day instead of wrapping around.

use chrono::{NaiveTime, Timelike};

use crate::error::{PlannerError, Result};

/// Minutes in a calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parse `"HH:MM:SS"` or `"HH:MM"` into a [`NaiveTime`].
///
/// # Errors
/// Returns `PlannerError::InvalidClockTime` for anything else, including
/// out-of-range hours or minutes.
pub fn parse_clock(value: &str) -> Result<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| PlannerError::InvalidClockTime(value.to_string()))
}

/// Format a time as `"HH:MM:SS"`, the shape the persistence layer stores.
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Minutes since midnight, seconds truncated.
pub fn minutes_of(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Build a time from minutes since midnight.
///
/// Values at or past midnight clamp to 23:59 so a shift that would spill into
/// the next day still lands on the same day's timeline.
pub fn from_minutes(minutes: u32) -> NaiveTime {
    let clamped = minutes.min(MINUTES_PER_DAY - 1);
    NaiveTime::from_num_seconds_from_midnight_opt(clamped * 60, 0).unwrap_or_default()
}

/// Build a time from an hour and minute, clamping out-of-range input.
pub fn hm(hour: u32, minute: u32) -> NaiveTime {
    from_minutes(hour * 60 + minute)
}

/// Serde adapter for a required clock time.
pub mod serde_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_clock(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for an optional clock time. Pair with `#[serde(default)]`.
pub mod serde_opt_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_some(&super::format_clock(*t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| super::parse_clock(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
