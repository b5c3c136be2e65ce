//! The call center's operating timezone.
//!
//! Accepts either an IANA zone name (`"Europe/London"`, `"UTC"`) or a fixed
//! UTC offset (`"+0200"`, `"-05:00"`, `"+02"`). Every instant the engine
//! reasons about is converted into this zone and carried as a
//! `DateTime<FixedOffset>`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::CallCenterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CallCenterTimeZone {
    /// An IANA timezone with its DST rules.
    Named(Tz),
    /// A constant offset from UTC.
    Fixed(FixedOffset),
}

impl CallCenterTimeZone {
    pub fn utc() -> Self {
        CallCenterTimeZone::Named(Tz::UTC)
    }

    /// Express an instant in call center local time.
    pub fn to_local<T: TimeZone>(&self, dt: &DateTime<T>) -> DateTime<FixedOffset> {
        match self {
            CallCenterTimeZone::Named(tz) => dt.with_timezone(tz).fixed_offset(),
            CallCenterTimeZone::Fixed(offset) => dt.with_timezone(offset),
        }
    }

    /// The current instant in call center local time, given a UTC reading.
    pub fn now_from(&self, utc: DateTime<Utc>) -> DateTime<FixedOffset> {
        self.to_local(&utc)
    }

    /// Resolve a local wall-clock time to an instant in this zone.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant. Times
    /// that do not exist (DST spring-forward gap) are interpreted with the
    /// offset in force before the gap, which moves the wall clock forward.
    pub fn localize(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            CallCenterTimeZone::Fixed(offset) => offset.from_local_datetime(naive).single(),
            CallCenterTimeZone::Named(tz) => match tz.from_local_datetime(naive) {
                LocalResult::Single(dt) => Some(dt.fixed_offset()),
                LocalResult::Ambiguous(earliest, _) => Some(earliest.fixed_offset()),
                LocalResult::None => {
                    let day_before = *naive - Duration::days(1);
                    let before = tz.offset_from_local_datetime(&day_before).earliest()?.fix();
                    let utc = *naive - Duration::seconds(i64::from(before.local_minus_utc()));
                    Some(tz.from_utc_datetime(&utc).fixed_offset())
                }
            },
        }
    }

    /// The zone identifier as it would be written in configuration.
    pub fn name(&self) -> String {
        match self {
            CallCenterTimeZone::Named(tz) => tz.name().to_string(),
            CallCenterTimeZone::Fixed(offset) => offset.to_string(),
        }
    }
}

impl Default for CallCenterTimeZone {
    fn default() -> Self {
        Self::utc()
    }
}

impl fmt::Display for CallCenterTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for CallCenterTimeZone {
    type Err = CallCenterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('+') || s.starts_with('-') {
            return parse_offset(s).map(CallCenterTimeZone::Fixed);
        }
        s.parse::<Tz>()
            .map(CallCenterTimeZone::Named)
            .map_err(|_| CallCenterError::InvalidTimezone(format!("'{s}'")))
    }
}

impl TryFrom<String> for CallCenterTimeZone {
    type Error = CallCenterError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CallCenterTimeZone> for String {
    fn from(tz: CallCenterTimeZone) -> Self {
        tz.name()
    }
}

impl From<Tz> for CallCenterTimeZone {
    fn from(tz: Tz) -> Self {
        CallCenterTimeZone::Named(tz)
    }
}

impl From<FixedOffset> for CallCenterTimeZone {
    fn from(offset: FixedOffset) -> Self {
        CallCenterTimeZone::Fixed(offset)
    }
}

/// Parse `+HH`, `+HHMM` or `+HH:MM` (and the `-` forms).
fn parse_offset(s: &str) -> Result<FixedOffset, CallCenterError> {
    let parsed = match s.len() {
        3 => format!("{s}:00").parse::<FixedOffset>(),
        5 | 6 => s.parse::<FixedOffset>(),
        _ => return Err(CallCenterError::InvalidTimezone(format!("'{s}'"))),
    };
    parsed.map_err(|e| CallCenterError::InvalidTimezone(format!("'{s}': {e}")))
}
