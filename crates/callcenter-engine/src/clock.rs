//! Sources of "now".
//!
//! [`CallCenter`](crate::CallCenter) reads the current instant through a
//! [`Clock`] so evaluation can be pinned to a fixed moment in tests and
//! simulations. [`SystemClock`] reads the OS clock via `chrono::Utc::now()`.

use std::fmt::Debug;

use chrono::{DateTime, TimeZone, Utc};

pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new<T: TimeZone>(instant: DateTime<T>) -> Self {
        FixedClock(instant.with_timezone(&Utc))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
