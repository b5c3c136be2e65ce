//! Callback-window validation.
//!
//! A requested callback time is valid when the call center is open at that
//! instant and the instant lies inside the response window: no earlier than
//! the minimum response time from now, no later than the maximum.
//!
//! Each bound is compared at the precision of its own metric. Hour bounds
//! compare at minute resolution, working-day bounds compare calendar dates in
//! the call center's timezone. A two-hour minimum computed at 09:00:17 is
//! therefore met by 11:00, and a six-working-day maximum is met by any time
//! on the sixth working day.
//!
//! "Now" comes from the override set with
//! [`CallCenter::override_current_time`] if there is one, otherwise from the
//! injected [`Clock`]. [`CallCenter::is_valid_time_at`] takes "now" as an
//! argument instead and touches no instance state.

use std::sync::Arc;

use chrono::{
    DateTime, Datelike, Days, Duration, FixedOffset, NaiveDateTime, NaiveTime, TimeZone, Timelike,
};

use crate::clock::{Clock, SystemClock};
use crate::config::CallCenterConfig;
use crate::error::{CallCenterError, Result};
use crate::opening_hours::{OpenHoursMatcher, OpeningHours};
use crate::response_time::{ResponseTime, ResponseTimeMetric};

#[derive(Debug, Clone)]
pub struct CallCenter<M = OpeningHours> {
    config: Arc<CallCenterConfig>,
    matcher: M,
    clock: Arc<dyn Clock>,
    /// Indexed by days from Sunday.
    working_days: [bool; 7],
    current_time_override: Option<DateTime<FixedOffset>>,
}

impl CallCenter<OpeningHours> {
    /// Build a call center matching opening hours with the bundled
    /// [`OpeningHours`] matcher.
    ///
    /// # Errors
    ///
    /// Returns [`CallCenterError::InvalidOpeningHours`] if any configured
    /// interval cannot be parsed.
    pub fn new(config: impl Into<Arc<CallCenterConfig>>) -> Result<Self> {
        let config = config.into();
        let matcher = OpeningHours::create(config.opening_hours(), config.time_zone())?;
        Ok(Self::with_matcher(config, matcher))
    }
}

impl<M: OpenHoursMatcher> CallCenter<M> {
    /// Build a call center that asks `matcher` whether it is open.
    pub fn with_matcher(config: impl Into<Arc<CallCenterConfig>>, matcher: M) -> Self {
        let config = config.into();
        let working_days = config.working_days();
        Self {
            config,
            matcher,
            clock: Arc::new(SystemClock),
            working_days,
            current_time_override: None,
        }
    }

    /// Replace the clock used when no current-time override is set.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Builder form of [`override_current_time`](Self::override_current_time).
    pub fn with_current_time<T: TimeZone>(mut self, current_time: DateTime<T>) -> Self {
        self.override_current_time(current_time);
        self
    }

    pub fn config(&self) -> &CallCenterConfig {
        &self.config
    }

    /// The current time in the call center's timezone.
    pub fn get_current_time(&self) -> DateTime<FixedOffset> {
        self.current_time_override
            .unwrap_or_else(|| self.config.time_zone().now_from(self.clock.now()))
    }

    /// Pin "now" to `current_time`, converted to the call center's timezone.
    pub fn override_current_time<T: TimeZone>(
        &mut self,
        current_time: DateTime<T>,
    ) -> &mut Self {
        self.current_time_override = Some(self.config.time_zone().to_local(&current_time));
        self
    }

    /// Go back to reading "now" from the clock.
    pub fn clear_current_time_override(&mut self) -> &mut Self {
        self.current_time_override = None;
        self
    }

    /// Whether `requested` is an acceptable callback time as of now.
    ///
    /// # Errors
    ///
    /// Returns [`CallCenterError::NoWorkingDays`] if a working-day bound must
    /// be resolved but no day of the week has opening hours.
    pub fn is_valid_time<T: TimeZone>(&self, requested: &DateTime<T>) -> Result<bool> {
        self.is_valid_time_at(&self.get_current_time(), requested)
    }

    /// Whether `requested` is an acceptable callback time as of `now`.
    ///
    /// # Examples
    ///
    /// ```
    /// use callcenter_engine::{
    ///     CallCenter, CallCenterConfig, CallCenterTimeZone, DayOfWeek, ResponseTime, WeeklyHours,
    /// };
    /// use chrono::DateTime;
    ///
    /// let mut hours = WeeklyHours::new();
    /// hours.insert(DayOfWeek::Monday, vec!["09:00-18:01".to_string()]);
    /// let config = CallCenterConfig::create(
    ///     hours,
    ///     CallCenterTimeZone::utc(),
    ///     ResponseTime::hours(2).unwrap(),
    ///     ResponseTime::working_days(6).unwrap(),
    /// );
    /// let call_center = CallCenter::new(config).unwrap();
    ///
    /// let now = DateTime::parse_from_rfc3339("2020-11-23T09:00:00Z").unwrap();
    /// let too_soon = DateTime::parse_from_rfc3339("2020-11-23T10:59:00Z").unwrap();
    /// let on_time = DateTime::parse_from_rfc3339("2020-11-23T11:00:00Z").unwrap();
    /// assert!(!call_center.is_valid_time_at(&now, &too_soon).unwrap());
    /// assert!(call_center.is_valid_time_at(&now, &on_time).unwrap());
    /// ```
    pub fn is_valid_time_at<N: TimeZone, T: TimeZone>(
        &self,
        now: &DateTime<N>,
        requested: &DateTime<T>,
    ) -> Result<bool> {
        let time_zone = self.config.time_zone();
        let requested = time_zone.to_local(requested);

        if !self.matcher.is_open_at(&requested) {
            tracing::debug!(%requested, "requested time is outside opening hours");
            return Ok(false);
        }

        let now = time_zone.to_local(now);
        let min = self.config.min_response_time();
        let max = self.config.max_response_time();

        let min_boundary = self.resolve_boundary_at(&now, min)?;
        if truncate(&requested, min.metric()) < truncate(&min_boundary, min.metric()) {
            tracing::debug!(
                %requested,
                %min_boundary,
                "requested time is before the minimum response time"
            );
            return Ok(false);
        }

        let max_boundary = self.resolve_boundary_at(&now, max)?;
        if truncate(&requested, max.metric()) > truncate(&max_boundary, max.metric()) {
            tracing::debug!(
                %requested,
                %max_boundary,
                "requested time is after the maximum response time"
            );
            return Ok(false);
        }

        Ok(true)
    }

    /// The instant `response_time` after the current time.
    ///
    /// # Errors
    ///
    /// See [`resolve_boundary_at`](Self::resolve_boundary_at).
    pub fn resolve_boundary(&self, response_time: ResponseTime) -> Result<DateTime<FixedOffset>> {
        self.resolve_boundary_at(&self.get_current_time(), response_time)
    }

    /// The instant `response_time` after `now`, in the call center's timezone.
    ///
    /// Hours are added as elapsed time. Working days advance the date past
    /// days that have opening hours until `response_time` of them are counted,
    /// keeping the wall-clock time of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`CallCenterError::NoWorkingDays`] for a working-day bound when
    /// no day of the week has opening hours.
    pub fn resolve_boundary_at<N: TimeZone>(
        &self,
        now: &DateTime<N>,
        response_time: ResponseTime,
    ) -> Result<DateTime<FixedOffset>> {
        let time_zone = self.config.time_zone();
        let now = time_zone.to_local(now);
        let value = response_time.value();

        match response_time.metric() {
            ResponseTimeMetric::Hours => now
                .checked_add_signed(Duration::hours(i64::from(value)))
                .map(|dt| time_zone.to_local(&dt))
                .ok_or_else(|| out_of_range(&now, response_time)),
            ResponseTimeMetric::WorkingDays => {
                let target = self.add_working_days(now.naive_local(), value, response_time)?;
                time_zone.localize(&target).ok_or_else(|| {
                    CallCenterError::InvalidTimezone(format!(
                        "local time {target} does not exist in {time_zone}"
                    ))
                })
            }
        }
    }

    fn add_working_days(
        &self,
        start: NaiveDateTime,
        days: u32,
        response_time: ResponseTime,
    ) -> Result<NaiveDateTime> {
        let per_week = self.working_days.iter().filter(|open| **open).count() as u32;
        if per_week == 0 {
            return Err(CallCenterError::NoWorkingDays);
        }

        // Skip whole weeks, leaving at least one working day for the walk so it
        // stops on a working day.
        let weeks = days.saturating_sub(1) / per_week;
        let mut date = start
            .date()
            .checked_add_days(Days::new(u64::from(weeks) * 7))
            .ok_or_else(|| out_of_range(&start, response_time))?;
        let mut remaining = days - weeks * per_week;
        while remaining > 0 {
            date = date
                .succ_opt()
                .ok_or_else(|| out_of_range(&start, response_time))?;
            if self.working_days[date.weekday().num_days_from_sunday() as usize] {
                remaining -= 1;
                tracing::trace!(%date, remaining, "counted working day");
            }
        }

        Ok(date.and_time(start.time()))
    }
}

/// Drop the precision below `metric`'s granularity.
///
/// Hours keep the minute, working days keep the local calendar date. Keys are
/// only comparable with keys produced for the same metric.
pub fn truncate(timestamp: &DateTime<FixedOffset>, metric: ResponseTimeMetric) -> NaiveDateTime {
    match metric {
        ResponseTimeMetric::Hours => {
            let utc = timestamp.naive_utc();
            utc - Duration::seconds(i64::from(utc.second()))
                - Duration::nanoseconds(i64::from(utc.nanosecond()))
        }
        ResponseTimeMetric::WorkingDays => timestamp.date_naive().and_time(NaiveTime::MIN),
    }
}

fn out_of_range(now: &impl std::fmt::Display, response_time: ResponseTime) -> CallCenterError {
    CallCenterError::InvalidConfiguration(format!(
        "{} {} from {now} is out of range",
        response_time.value(),
        response_time.metric()
    ))
}
