use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display};
use std::str::FromStr;

use super::error::SchedulingError;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time within a single day, stored as minutes since midnight.
///
/// Parsed from `"H:MM"` or `"HH:MM"` and always rendered zero-padded, so
/// comparisons are numeric and `"9:00"` equals `"09:00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { minutes: 0 };
    pub const LAST_MINUTE: TimeOfDay = TimeOfDay {
        minutes: (MINUTES_PER_DAY - 1) as u16,
    };

    pub fn from_hm(hour: u8, minute: u8) -> Result<Self, SchedulingError> {
        if hour > 23 || minute > 59 {
            return Err(SchedulingError::InvalidTime(format!("{}:{:02}", hour, minute)));
        }
        Ok(Self {
            minutes: hour as u16 * 60 + minute as u16,
        })
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self {
            minutes: minutes as u16,
        })
    }

    pub fn minutes(self) -> u32 {
        self.minutes as u32
    }

    pub fn hour(self) -> u8 {
        (self.minutes / 60) as u8
    }

    pub fn minute(self) -> u8 {
        (self.minutes % 60) as u8
    }

    /// Adds `minutes`, returning `None` when the result leaves the day.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<Self> {
        self.minutes()
            .checked_add(minutes)
            .and_then(Self::from_minutes)
    }

    pub fn to_time(self) -> time::Time {
        // hour() <= 23 and minute() <= 59 by construction
        time::Time::from_hms(self.hour(), self.minute(), 0).unwrap_or(time::Time::MIDNIGHT)
    }
}

impl From<time::Time> for TimeOfDay {
    fn from(t: time::Time) -> Self {
        Self {
            minutes: t.hour() as u16 * 60 + t.minute() as u16,
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SchedulingError::InvalidTime(s.to_string());

        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        let hour_ok = matches!(hour.len(), 1 | 2) && hour.bytes().all(|b| b.is_ascii_digit());
        let minute_ok = minute.len() == 2 && minute.bytes().all(|b| b.is_ascii_digit());
        if !hour_ok || !minute_ok {
            return Err(invalid());
        }

        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).map_err(|_| invalid())
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn parses_padded_and_unpadded_hours() {
        assert_eq!(t("09:00"), t("9:00"));
        assert_eq!(t("09:00").minutes(), 540);
        assert_eq!(t("23:59"), TimeOfDay::LAST_MINUTE);
        assert_eq!(t("0:00"), TimeOfDay::MIDNIGHT);
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in [
            "", "9", "24:00", "12:60", "12:5", "12:005", "ab:cd", "-1:00", "12:00:00", " 9:00",
            "123:00",
        ] {
            assert!(
                matches!(bad.parse::<TimeOfDay>(), Err(SchedulingError::InvalidTime(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn orders_numerically() {
        // lexicographically "9:30" > "10:00"
        assert!(t("9:30") < t("10:00"));
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(t("7:05").to_string(), "07:05");
    }

    #[test]
    fn adding_minutes_wraps_hours_but_not_days() {
        assert_eq!(t("10:45").checked_add_minutes(30), Some(t("11:15")));
        assert_eq!(t("23:00").checked_add_minutes(59), Some(t("23:59")));
        assert_eq!(t("23:00").checked_add_minutes(60), None);
        assert_eq!(t("23:59").checked_add_minutes(u32::MAX), None);
    }

    #[test]
    fn serde_uses_hh_mm_strings() {
        let json = serde_json::to_string(&t("8:30")).unwrap();
        assert_eq!(json, "\"08:30\"");
        let back: TimeOfDay = serde_json::from_str("\"17:45\"").unwrap();
        assert_eq!(back, t("17:45"));
        assert!(serde_json::from_str::<TimeOfDay>("\"25:00\"").is_err());
    }

    #[test]
    fn converts_from_time_crate() {
        let clock = time::Time::from_hms(14, 20, 31).unwrap();
        assert_eq!(TimeOfDay::from(clock), t("14:20"));
        assert_eq!(t("14:20").to_time(), time::Time::from_hms(14, 20, 0).unwrap());
    }
}
