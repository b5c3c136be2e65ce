//! Weekly opening hours and the open-hours matcher.
//!
//! [`OpenHoursMatcher`] is the only thing [`CallCenter`](crate::CallCenter)
//! needs to know about a schedule: whether a given instant is inside an open
//! interval. [`OpeningHours`] is the bundled implementation, built from the
//! `"HH:MM-HH:MM"` strings of a [`CallCenterConfig`](crate::CallCenterConfig).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::CallCenterError;
use crate::timezone::CallCenterTimeZone;

/// Weekday name → interval strings, as written in configuration.
pub type WeeklyHours = BTreeMap<DayOfWeek, Vec<String>>;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Days of the week as they appear in opening-hours configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All seven days, Monday first.
    pub fn all() -> [DayOfWeek; 7] {
        [
            DayOfWeek::Monday,
            DayOfWeek::Tuesday,
            DayOfWeek::Wednesday,
            DayOfWeek::Thursday,
            DayOfWeek::Friday,
            DayOfWeek::Saturday,
            DayOfWeek::Sunday,
        ]
    }

    /// Converts from chrono's Weekday.
    pub fn from_chrono(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => DayOfWeek::Monday,
            chrono::Weekday::Tue => DayOfWeek::Tuesday,
            chrono::Weekday::Wed => DayOfWeek::Wednesday,
            chrono::Weekday::Thu => DayOfWeek::Thursday,
            chrono::Weekday::Fri => DayOfWeek::Friday,
            chrono::Weekday::Sat => DayOfWeek::Saturday,
            chrono::Weekday::Sun => DayOfWeek::Sunday,
        }
    }

    /// Sunday = 0 … Saturday = 6.
    pub fn num_days_from_sunday(&self) -> usize {
        match self {
            DayOfWeek::Sunday => 0,
            DayOfWeek::Monday => 1,
            DayOfWeek::Tuesday => 2,
            DayOfWeek::Wednesday => 3,
            DayOfWeek::Thursday => 4,
            DayOfWeek::Friday => 5,
            DayOfWeek::Saturday => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = CallCenterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        DayOfWeek::all()
            .into_iter()
            .find(|day| day.as_str() == lower)
            .ok_or_else(|| CallCenterError::InvalidConfiguration(format!("Unknown weekday: {s}")))
    }
}

impl TryFrom<String> for DayOfWeek {
    type Error = CallCenterError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DayOfWeek> for String {
    fn from(day: DayOfWeek) -> Self {
        day.as_str().to_string()
    }
}

/// Time of day with minute precision. `24:00` is allowed as an interval end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Minutes since midnight.
    pub fn to_minutes(&self) -> u16 {
        self.0
    }

    fn from_time(time: NaiveTime) -> Self {
        TimeOfDay((time.hour() * 60 + time.minute()) as u16)
    }
}

impl FromStr for TimeOfDay {
    type Err = CallCenterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CallCenterError::InvalidOpeningHours(format!("invalid time '{s}'"));

        let trimmed = s.trim();
        if trimmed == "24:00" {
            return Ok(TimeOfDay(MINUTES_PER_DAY));
        }
        if trimmed.len() != 5 {
            return Err(invalid());
        }
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map(TimeOfDay::from_time)
            .map_err(|_| invalid())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// One open interval, `start` inclusive and `end` exclusive.
///
/// Supports overnight intervals where end < start (e.g., 22:00-02:00).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningInterval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl OpeningInterval {
    /// Returns true if this interval crosses midnight.
    pub fn is_overnight(&self) -> bool {
        self.end < self.start
    }

    /// Whether `time` is open on the day this interval is configured for.
    fn contains_same_day(&self, time: TimeOfDay) -> bool {
        if self.is_overnight() {
            time >= self.start
        } else {
            time >= self.start && time < self.end
        }
    }

    /// Whether `time` on the following day falls in this interval's overflow.
    fn contains_next_day(&self, time: TimeOfDay) -> bool {
        self.is_overnight() && time < self.end
    }
}

impl FromStr for OpeningInterval {
    type Err = CallCenterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.split_once('-').ok_or_else(|| {
            CallCenterError::InvalidOpeningHours(format!("expected 'HH:MM-HH:MM', got '{s}'"))
        })?;
        let start: TimeOfDay = start.parse()?;
        let end: TimeOfDay = end.parse()?;

        if start.to_minutes() >= MINUTES_PER_DAY || start == end {
            return Err(CallCenterError::InvalidOpeningHours(format!(
                "empty or out-of-range interval '{s}'"
            )));
        }
        Ok(OpeningInterval { start, end })
    }
}

impl fmt::Display for OpeningInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Answers whether an instant falls within an open interval.
pub trait OpenHoursMatcher {
    fn is_open_at(&self, instant: &DateTime<FixedOffset>) -> bool;
}

impl<F> OpenHoursMatcher for F
where
    F: Fn(&DateTime<FixedOffset>) -> bool,
{
    fn is_open_at(&self, instant: &DateTime<FixedOffset>) -> bool {
        self(instant)
    }
}

/// Parsed weekly schedule bound to a timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningHours {
    /// Indexed by days from Sunday.
    days: [Vec<OpeningInterval>; 7],
    time_zone: CallCenterTimeZone,
}

impl OpeningHours {
    /// Parse a weekly schedule. Days missing from `hours` are closed.
    ///
    /// # Errors
    ///
    /// Returns [`CallCenterError::InvalidOpeningHours`] if any interval string
    /// is malformed or empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use callcenter_engine::{
    ///     CallCenterTimeZone, DayOfWeek, OpenHoursMatcher, OpeningHours, WeeklyHours,
    /// };
    /// use chrono::DateTime;
    ///
    /// let mut hours = WeeklyHours::new();
    /// hours.insert(DayOfWeek::Monday, vec!["09:00-18:01".to_string()]);
    /// let opening = OpeningHours::create(&hours, CallCenterTimeZone::utc()).unwrap();
    ///
    /// let monday_evening = DateTime::parse_from_rfc3339("2020-11-23T18:00:00Z").unwrap();
    /// assert!(opening.is_open_at(&monday_evening));
    /// ```
    pub fn create(
        hours: &WeeklyHours,
        time_zone: CallCenterTimeZone,
    ) -> Result<Self, CallCenterError> {
        let mut days: [Vec<OpeningInterval>; 7] = Default::default();
        for (day, intervals) in hours {
            days[day.num_days_from_sunday()] = intervals
                .iter()
                .map(|s| s.parse::<OpeningInterval>())
                .collect::<Result<Vec<_>, _>>()?;
        }
        Ok(Self { days, time_zone })
    }

    pub fn time_zone(&self) -> CallCenterTimeZone {
        self.time_zone
    }

    /// The intervals configured for `day`.
    pub fn intervals(&self, day: DayOfWeek) -> &[OpeningInterval] {
        &self.days[day.num_days_from_sunday()]
    }

    /// Whether `day` has at least one open interval.
    pub fn is_open_on(&self, day: DayOfWeek) -> bool {
        !self.intervals(day).is_empty()
    }
}

impl OpenHoursMatcher for OpeningHours {
    fn is_open_at(&self, instant: &DateTime<FixedOffset>) -> bool {
        let local = self.time_zone.to_local(instant);
        let today = local.weekday().num_days_from_sunday() as usize;
        let yesterday = (today + 6) % 7;
        let time = TimeOfDay::from_time(local.time());

        self.days[today]
            .iter()
            .any(|interval| interval.contains_same_day(time))
            || self.days[yesterday]
                .iter()
                .any(|interval| interval.contains_next_day(time))
    }
}
