//! Minimum and maximum response times.
//!
//! A [`ResponseTime`] is a lead-time bound: a [`ResponseTimeMetric`] and a
//! strictly positive magnitude. Construction is the only place the bound is
//! validated; a `ResponseTime` that exists is always usable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CallCenterError;

/// Unit a response time is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseTimeMetric {
    /// Plain clock hours, crossing day boundaries normally.
    Hours,
    /// Calendar days on which the call center has at least one open interval.
    WorkingDays,
}

impl ResponseTimeMetric {
    /// The wire name of the metric (`"hours"` or `"working_days"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseTimeMetric::Hours => "hours",
            ResponseTimeMetric::WorkingDays => "working_days",
        }
    }
}

impl fmt::Display for ResponseTimeMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseTimeMetric {
    type Err = CallCenterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hours" => Ok(ResponseTimeMetric::Hours),
            "working_days" => Ok(ResponseTimeMetric::WorkingDays),
            other => Err(CallCenterError::InvalidConfiguration(format!(
                "Unknown time metric: {other}"
            ))),
        }
    }
}

/// A lead-time bound relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawResponseTime", into = "RawResponseTime")]
pub struct ResponseTime {
    metric: ResponseTimeMetric,
    value: u32,
}

impl ResponseTime {
    /// Build a response time from a metric name and a magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`CallCenterError::InvalidConfiguration`] if `metric` is not
    /// `"hours"` or `"working_days"`, or if `value` is not a positive integer.
    /// The metric is checked first.
    ///
    /// # Examples
    ///
    /// ```
    /// use callcenter_engine::{ResponseTime, ResponseTimeMetric};
    ///
    /// let rt = ResponseTime::create("working_days", 6).unwrap();
    /// assert_eq!(rt.metric(), ResponseTimeMetric::WorkingDays);
    /// assert_eq!(rt.value(), 6);
    ///
    /// assert!(ResponseTime::create("fortnights", 1).is_err());
    /// assert!(ResponseTime::create("hours", 0).is_err());
    /// ```
    pub fn create(metric: &str, value: i64) -> Result<Self, CallCenterError> {
        let metric = metric.parse::<ResponseTimeMetric>()?;
        let value = u32::try_from(value).map_err(|_| positive_value_error())?;
        Self::new(metric, value)
    }

    /// Build a response time from a typed metric.
    ///
    /// # Errors
    ///
    /// Returns [`CallCenterError::InvalidConfiguration`] if `value` is zero.
    pub fn new(metric: ResponseTimeMetric, value: u32) -> Result<Self, CallCenterError> {
        if value < 1 {
            return Err(positive_value_error());
        }
        Ok(Self { metric, value })
    }

    /// Shorthand for `ResponseTime::new(ResponseTimeMetric::Hours, hours)`.
    pub fn hours(hours: u32) -> Result<Self, CallCenterError> {
        Self::new(ResponseTimeMetric::Hours, hours)
    }

    /// Shorthand for `ResponseTime::new(ResponseTimeMetric::WorkingDays, days)`.
    pub fn working_days(days: u32) -> Result<Self, CallCenterError> {
        Self::new(ResponseTimeMetric::WorkingDays, days)
    }

    pub fn metric(&self) -> ResponseTimeMetric {
        self.metric
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}

fn positive_value_error() -> CallCenterError {
    CallCenterError::InvalidConfiguration("Value must be a positive integer".to_string())
}

/// Unvalidated wire form, so deserialization goes through [`ResponseTime::create`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RawResponseTime {
    metric: String,
    value: i64,
}

impl TryFrom<RawResponseTime> for ResponseTime {
    type Error = CallCenterError;

    fn try_from(raw: RawResponseTime) -> Result<Self, Self::Error> {
        ResponseTime::create(&raw.metric, raw.value)
    }
}

impl From<ResponseTime> for RawResponseTime {
    fn from(rt: ResponseTime) -> Self {
        RawResponseTime {
            metric: rt.metric.as_str().to_string(),
            value: i64::from(rt.value),
        }
    }
}
