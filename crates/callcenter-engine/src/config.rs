//! Call center configuration.

use serde::{Deserialize, Serialize};

use crate::error::CallCenterError;
use crate::opening_hours::{DayOfWeek, OpeningHours, WeeklyHours};
use crate::response_time::{RawResponseTime, ResponseTime};
use crate::timezone::CallCenterTimeZone;

/// Opening hours, timezone and response-time window of a call center.
///
/// No cross-field validation is performed: a minimum response time that lies
/// beyond the maximum is accepted and simply never yields a valid time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCallCenterConfig", into = "RawCallCenterConfig")]
pub struct CallCenterConfig {
    opening_hours: WeeklyHours,
    time_zone: CallCenterTimeZone,
    min_response_time: ResponseTime,
    max_response_time: ResponseTime,
}

impl CallCenterConfig {
    pub fn create(
        opening_hours: WeeklyHours,
        time_zone: CallCenterTimeZone,
        min_response_time: ResponseTime,
        max_response_time: ResponseTime,
    ) -> Self {
        Self {
            opening_hours,
            time_zone,
            min_response_time,
            max_response_time,
        }
    }

    /// Load a configuration from JSON.
    ///
    /// ```json
    /// {
    ///   "opening_hours": { "monday": ["09:00-18:01"], "sunday": [] },
    ///   "time_zone": "Europe/London",
    ///   "min_response_time": { "metric": "hours", "value": 2 },
    ///   "max_response_time": { "metric": "working_days", "value": 6 }
    /// }
    /// ```
    ///
    /// `time_zone` defaults to UTC when omitted. Weekday names are matched
    /// case-insensitively and each day may appear only once. Interval strings
    /// are parsed here, so a configuration that loads also builds a
    /// [`CallCenter`](crate::CallCenter).
    ///
    /// # Errors
    ///
    /// Returns [`CallCenterError::InvalidConfiguration`] for malformed JSON,
    /// unknown or repeated weekday names, unknown metrics or non-positive
    /// values, [`CallCenterError::InvalidTimezone`] for an unrecognized
    /// timezone, and [`CallCenterError::InvalidOpeningHours`] for an interval
    /// that cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, CallCenterError> {
        let raw: RawCallCenterConfig = serde_json::from_str(json)
            .map_err(|e| CallCenterError::InvalidConfiguration(e.to_string()))?;
        Self::try_from(raw)
    }

    pub fn opening_hours(&self) -> &WeeklyHours {
        &self.opening_hours
    }

    pub fn time_zone(&self) -> CallCenterTimeZone {
        self.time_zone
    }

    pub fn min_response_time(&self) -> ResponseTime {
        self.min_response_time
    }

    pub fn max_response_time(&self) -> ResponseTime {
        self.max_response_time
    }

    /// Days with at least one configured interval, indexed Sunday = 0 … Saturday = 6.
    pub fn working_days(&self) -> [bool; 7] {
        let mut days = [false; 7];
        for day in DayOfWeek::all() {
            days[day.num_days_from_sunday()] = self
                .opening_hours
                .get(&day)
                .is_some_and(|intervals| !intervals.is_empty());
        }
        days
    }
}

/// Unvalidated wire form. Weekday keys stay as written so that repeats
/// survive until validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawCallCenterConfig {
    #[serde(with = "weekday_entries")]
    opening_hours: Vec<(String, Vec<String>)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
    min_response_time: RawResponseTime,
    max_response_time: RawResponseTime,
}

impl TryFrom<RawCallCenterConfig> for CallCenterConfig {
    type Error = CallCenterError;

    fn try_from(raw: RawCallCenterConfig) -> Result<Self, Self::Error> {
        let mut opening_hours = WeeklyHours::new();
        for (name, intervals) in raw.opening_hours {
            let day: DayOfWeek = name.parse()?;
            if opening_hours.insert(day, intervals).is_some() {
                return Err(CallCenterError::InvalidConfiguration(format!(
                    "Duplicate weekday: {name}"
                )));
            }
        }

        let time_zone = match raw.time_zone {
            Some(name) => name.parse()?,
            None => CallCenterTimeZone::default(),
        };
        OpeningHours::create(&opening_hours, time_zone)?;

        Ok(Self::create(
            opening_hours,
            time_zone,
            raw.min_response_time.try_into()?,
            raw.max_response_time.try_into()?,
        ))
    }
}

impl From<CallCenterConfig> for RawCallCenterConfig {
    fn from(config: CallCenterConfig) -> Self {
        RawCallCenterConfig {
            opening_hours: config
                .opening_hours
                .into_iter()
                .map(|(day, intervals)| (day.to_string(), intervals))
                .collect(),
            time_zone: Some(config.time_zone.name()),
            min_response_time: config.min_response_time.into(),
            max_response_time: config.max_response_time.into(),
        }
    }
}

/// A JSON object read as an ordered list of entries, keeping repeated keys.
mod weekday_entries {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, Vec<String>)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Vec<(String, Vec<String>)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of weekday names to interval lists")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }

    pub fn serialize<S>(
        entries: &[(String, Vec<String>)],
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(entries.iter().map(|(day, intervals)| (day, intervals)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response_time::ResponseTimeMetric;

    const EXAMPLE: &str = r#"{
        "opening_hours": {
            "monday": ["09:00-18:01"],
            "tuesday": ["09:00-18:01"],
            "saturday": ["09:00-12:31"],
            "sunday": []
        },
        "time_zone": "+0200",
        "min_response_time": { "metric": "hours", "value": 2 },
        "max_response_time": { "metric": "working_days", "value": 6 }
    }"#;

    #[test]
    fn test_from_json() {
        let config = CallCenterConfig::from_json(EXAMPLE).unwrap();
        assert_eq!(config.time_zone().name(), "+02:00");
        assert_eq!(config.min_response_time().metric(), ResponseTimeMetric::Hours);
        assert_eq!(config.min_response_time().value(), 2);
        assert_eq!(
            config.max_response_time().metric(),
            ResponseTimeMetric::WorkingDays
        );
        assert_eq!(config.opening_hours().len(), 4);
    }

    #[test]
    fn test_from_json_defaults_to_utc() {
        let json = r#"{
            "opening_hours": {},
            "min_response_time": { "metric": "hours", "value": 1 },
            "max_response_time": { "metric": "hours", "value": 1 }
        }"#;
        let config = CallCenterConfig::from_json(json).unwrap();
        assert_eq!(config.time_zone(), CallCenterTimeZone::utc());
    }

    #[test]
    fn test_from_json_rejects_bad_metric() {
        let json = EXAMPLE.replace("working_days", "fortnights");
        let err = CallCenterConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, CallCenterError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("Unknown time metric: fortnights"), "got: {err}");
    }

    #[test]
    fn test_from_json_rejects_bad_weekday() {
        let json = EXAMPLE.replace("\"tuesday\"", "\"someday\"");
        let err = CallCenterConfig::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("Unknown weekday"), "got: {err}");
    }

    #[test]
    fn test_from_json_rejects_bad_timezone() {
        let json = EXAMPLE.replace("+0200", "Mars/Olympus");
        let err = CallCenterConfig::from_json(&json).unwrap_err();
        assert_eq!(
            err,
            CallCenterError::InvalidTimezone("'Mars/Olympus'".to_string())
        );
    }

    #[test]
    fn test_from_json_rejects_weekday_differing_only_in_case() {
        let json = EXAMPLE.replace("\"tuesday\"", "\"Monday\"");
        let err = CallCenterConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, CallCenterError::InvalidConfiguration(_)), "got: {err}");
        assert!(err.to_string().contains("Duplicate weekday"), "got: {err}");
    }

    #[test]
    fn test_from_json_rejects_repeated_weekday_key() {
        let json = r#"{
            "opening_hours": { "monday": ["09:00-10:00"], "monday": [] },
            "min_response_time": { "metric": "hours", "value": 1 },
            "max_response_time": { "metric": "hours", "value": 2 }
        }"#;
        let err = CallCenterConfig::from_json(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate weekday: monday"), "got: {err}");
    }

    #[test]
    fn test_from_json_rejects_unparseable_interval() {
        let json = EXAMPLE.replace("09:00-12:31", "x");
        let err = CallCenterConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, CallCenterError::InvalidOpeningHours(_)), "got: {err}");
    }

    #[test]
    fn test_from_json_malformed_is_invalid_configuration() {
        let err = CallCenterConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CallCenterError::InvalidConfiguration(_)), "got: {err}");
    }

    #[test]
    fn test_serialized_config_loads_back() {
        let config = CallCenterConfig::from_json(EXAMPLE).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""monday":["09:00-18:01"]"#), "got: {json}");
        assert_eq!(CallCenterConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_min_above_max_is_accepted() {
        let config = CallCenterConfig::create(
            WeeklyHours::new(),
            CallCenterTimeZone::utc(),
            ResponseTime::working_days(10).unwrap(),
            ResponseTime::hours(1).unwrap(),
        );
        assert_eq!(config.min_response_time().value(), 10);
    }

    #[test]
    fn test_working_days() {
        let config = CallCenterConfig::from_json(EXAMPLE).unwrap();
        // Sun, Mon, Tue, Wed, Thu, Fri, Sat
        assert_eq!(
            config.working_days(),
            [false, true, true, false, false, false, true]
        );
    }
}
