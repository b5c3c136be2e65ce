//! # callcenter-engine
//!
//! Deterministic callback-window validation for call centers.
//!
//! Given a weekly schedule of opening hours, an operating timezone and a
//! minimum and maximum response time, decides whether a requested callback
//! instant is acceptable: the call center must be open at that instant, and
//! the instant must fall between "now + minimum" and "now + maximum".
//! Response times are expressed in clock hours or in working days.
//!
//! ## Modules
//!
//! - [`call_center`] — Validity check, response-window boundaries, precision truncation
//! - [`config`] — Opening hours, timezone and response times of a call center
//! - [`response_time`] — Response-time metric and magnitude
//! - [`opening_hours`] — Weekly schedule parsing and the open-hours matcher
//! - [`timezone`] — IANA or fixed-offset operating timezone
//! - [`clock`] — Injectable source of "now"
//! - [`error`] — Error types

pub mod call_center;
pub mod clock;
pub mod config;
pub mod error;
pub mod opening_hours;
pub mod response_time;
pub mod timezone;

pub use call_center::{truncate, CallCenter};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CallCenterConfig;
pub use error::CallCenterError;
pub use opening_hours::{
    DayOfWeek, OpenHoursMatcher, OpeningHours, OpeningInterval, TimeOfDay, WeeklyHours,
};
pub use response_time::{ResponseTime, ResponseTimeMetric};
pub use timezone::CallCenterTimeZone;
