//! Canonical Unix-second windows for `since`/`until` parameters.

use chrono::{DateTime, Datelike, NaiveTime, TimeDelta, Utc};
use serde::Serialize;

/// Inclusive `[start, end]` range in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeFrames {
    /// Monday 00:00:00 through Sunday 23:59:59 of the current ISO week.
    pub current_week: TimeWindow,
    /// The ISO week before `current_week`.
    pub last_week: TimeWindow,
    pub rolling_7_days: TimeWindow,
    pub rolling_90_days: TimeWindow,
}

/// Windows relative to the current UTC time.
#[must_use]
pub fn time_frames() -> TimeFrames {
    time_frames_at(Utc::now())
}

/// Windows relative to `now`.
#[must_use]
pub fn time_frames_at(now: DateTime<Utc>) -> TimeFrames {
    let days_into_week = i64::from(now.weekday().num_days_from_monday());
    let week_start = (now.date_naive() - TimeDelta::days(days_into_week))
        .and_time(NaiveTime::MIN)
        .and_utc();
    let last_week_start = week_start - TimeDelta::days(7);

    TimeFrames {
        current_week: week_of(week_start),
        last_week: week_of(last_week_start),
        rolling_7_days: TimeWindow {
            start: (now - TimeDelta::days(7)).timestamp(),
            end: now.timestamp(),
        },
        rolling_90_days: TimeWindow {
            start: (now - TimeDelta::days(90)).timestamp(),
            end: now.timestamp(),
        },
    }
}

/// Monday 00:00:00 .. Sunday 23:59:59 starting at `monday`.
fn week_of(monday: DateTime<Utc>) -> TimeWindow {
    let end = monday + TimeDelta::days(7) - TimeDelta::seconds(1);
    TimeWindow {
        start: monday.timestamp(),
        end: end.timestamp(),
    }
}
