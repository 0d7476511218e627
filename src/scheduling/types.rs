use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use time::Date;
use uuid::Uuid;

use super::error::SchedulingError;
use super::time_of_day::TimeOfDay;

/// Weekday index used by working hours: 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: Date) -> u8 {
    date.weekday().number_days_from_sunday()
}

/// Opening hours of the salon for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHours {
    pub day_of_week: u8,
    pub is_open: bool,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl WorkingHours {
    pub fn open(day_of_week: u8, start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self {
            day_of_week,
            is_open: true,
            start_time,
            end_time,
        }
    }

    pub fn closed(day_of_week: u8) -> Self {
        Self {
            day_of_week,
            is_open: false,
            start_time: TimeOfDay::MIDNIGHT,
            end_time: TimeOfDay::MIDNIGHT,
        }
    }

    pub fn check(&self) -> Result<(), SchedulingError> {
        if self.day_of_week > 6 {
            return Err(SchedulingError::InvalidWorkingHours {
                day_of_week: self.day_of_week,
                reason: "day of week must be between 0 and 6".to_string(),
            });
        }
        if self.is_open && self.start_time >= self.end_time {
            return Err(SchedulingError::InvalidWorkingHours {
                day_of_week: self.day_of_week,
                reason: format!("opens at {} but closes at {}", self.start_time, self.end_time),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    #[serde(alias = "pending")]
    Pending,
    #[serde(alias = "confirmed")]
    Confirmed,
    #[serde(alias = "completed")]
    Completed,
    #[serde(alias = "cancelled")]
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }

    /// Only pending and confirmed appointments hold their slot.
    pub fn blocks_slot(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }

    /// Statuses only move forward; completed and cancelled are final.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        if self.is_terminal() || *self == next {
            return false;
        }
        next != AppointmentStatus::Pending
    }
}

impl Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(AppointmentStatus::Pending),
            "CONFIRMED" => Ok(AppointmentStatus::Confirmed),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            _ => Err(format!("Unknown appointment status: {}", s)),
        }
    }
}

/// An appointment already on the books, as seen by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingAppointment {
    pub id: Option<Uuid>,
    pub professional_id: Uuid,
    pub date: Date,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub status: AppointmentStatus,
}

impl ExistingAppointment {
    pub fn blocks(&self, professional_id: Uuid, date: Date) -> bool {
        self.status.blocks_slot() && self.professional_id == professional_id && self.date == date
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub professional_id: Uuid,
    pub date: Date,
    pub start_time: TimeOfDay,
    pub service_duration_minutes: u32,
}

impl AppointmentRequest {
    /// End of the requested range, or an error when it would leave the day.
    pub fn end_time(&self) -> Result<TimeOfDay, SchedulingError> {
        if self.service_duration_minutes == 0 {
            return Err(SchedulingError::InvalidDuration);
        }
        self.start_time
            .checked_add_minutes(self.service_duration_minutes)
            .ok_or_else(|| SchedulingError::CrossesMidnight {
                start: self.start_time.to_string(),
                duration_minutes: self.service_duration_minutes,
            })
    }
}

/// Optional booking rules layered on top of the core checks.
///
/// Both rules are disabled by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingPolicy {
    pub min_lead_minutes: u32,
    pub max_days_ahead: Option<u16>,
}

/// Half-open interval overlap: touching ranges do not overlap.
pub fn overlaps(
    a_start: TimeOfDay,
    a_end: TimeOfDay,
    b_start: TimeOfDay,
    b_end: TimeOfDay,
) -> bool {
    a_start < b_end && b_start < a_end
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn weekday_index_starts_on_sunday() {
        assert_eq!(weekday_index(date!(2026 - 10 - 18)), 0);
        assert_eq!(weekday_index(date!(2026 - 10 - 19)), 1);
        assert_eq!(weekday_index(date!(2026 - 10 - 24)), 6);
    }

    #[test]
    fn only_pending_and_confirmed_block() {
        assert!(AppointmentStatus::Pending.blocks_slot());
        assert!(AppointmentStatus::Confirmed.blocks_slot());
        assert!(!AppointmentStatus::Completed.blocks_slot());
        assert!(!AppointmentStatus::Cancelled.blocks_slot());
    }

    #[test]
    fn terminal_statuses_cannot_move() {
        for next in [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ] {
            assert!(!AppointmentStatus::Cancelled.can_transition_to(next));
            assert!(!AppointmentStatus::Completed.can_transition_to(next));
        }
        assert!(AppointmentStatus::Pending.can_transition_to(AppointmentStatus::Confirmed));
        assert!(!AppointmentStatus::Confirmed.can_transition_to(AppointmentStatus::Pending));
    }

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!("confirmed".parse::<AppointmentStatus>(), Ok(AppointmentStatus::Confirmed));
        assert_eq!(AppointmentStatus::Cancelled.to_string(), "CANCELLED");
        assert_eq!(serde_json::to_string(&AppointmentStatus::Pending).unwrap(), "\"PENDING\"");
        assert!("done".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn overlap_is_half_open() {
        assert!(overlaps(t("10:30"), t("11:15"), t("10:00"), t("11:00")));
        assert!(!overlaps(t("11:00"), t("11:30"), t("10:00"), t("11:00")));
        assert!(!overlaps(t("09:00"), t("10:00"), t("10:00"), t("11:00")));
        assert!(overlaps(t("09:00"), t("12:00"), t("10:00"), t("11:00")));
    }

    #[test]
    fn working_hours_must_open_before_closing() {
        assert!(WorkingHours::open(1, t("09:00"), t("18:00")).check().is_ok());
        assert!(WorkingHours::open(1, t("18:00"), t("09:00")).check().is_err());
        assert!(WorkingHours::open(7, t("09:00"), t("18:00")).check().is_err());
        assert!(WorkingHours::closed(0).check().is_ok());
    }

    #[test]
    fn request_end_time_rejects_zero_and_overflow() {
        let mut request = AppointmentRequest {
            client_id: Uuid::nil(),
            service_id: Uuid::nil(),
            professional_id: Uuid::nil(),
            date: date!(2026 - 10 - 20),
            start_time: t("23:30"),
            service_duration_minutes: 0,
        };
        assert_eq!(request.end_time(), Err(SchedulingError::InvalidDuration));

        request.service_duration_minutes = 29;
        assert_eq!(request.end_time(), Ok(t("23:59")));

        request.service_duration_minutes = 30;
        assert!(matches!(request.end_time(), Err(SchedulingError::CrossesMidnight { .. })));
    }
}
