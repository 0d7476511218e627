use serde::Serialize;
use time::{Date, PrimitiveDateTime};
use uuid::Uuid;

use super::error::SchedulingError;
use super::time_of_day::TimeOfDay;
use super::types::{overlaps, AppointmentRequest, ExistingAppointment, WorkingHours};
use super::validator::{Rejection, SlotValidator, Verdict};

/// How candidate start times are laid out over a working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotGrid {
    pub interval_minutes: u32,
    pub break_start: Option<TimeOfDay>,
    pub break_end: Option<TimeOfDay>,
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self {
            interval_minutes: 30,
            break_start: None,
            break_end: None,
        }
    }
}

impl SlotGrid {
    fn hits_break(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        match (self.break_start, self.break_end) {
            (Some(from), Some(to)) => overlaps(start, end, from, to),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailability {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<Rejection>,
}

/// Lists bookable start times for one professional on one date.
///
/// Every candidate goes through `validator`, so a slot is reported
/// available exactly when booking it would be accepted. A closed or past
/// day yields no slots at all.
#[allow(clippy::too_many_arguments)]
pub fn available_slots(
    validator: &SlotValidator,
    professional_id: Uuid,
    date: Date,
    duration_minutes: u32,
    working_hours: Option<&WorkingHours>,
    existing: &[ExistingAppointment],
    grid: &SlotGrid,
    now: PrimitiveDateTime,
) -> Result<Vec<SlotAvailability>, SchedulingError> {
    if duration_minutes == 0 {
        return Err(SchedulingError::InvalidDuration);
    }
    let hours = match working_hours {
        Some(hours) if hours.is_open => hours,
        _ => return Ok(Vec::new()),
    };
    hours.check()?;
    if date < now.date() {
        return Ok(Vec::new());
    }

    let step = grid.interval_minutes.max(1);
    let mut slots = Vec::new();
    let mut cursor = Some(hours.start_time);

    while let Some(start) = cursor {
        let end = match start.checked_add_minutes(duration_minutes) {
            Some(end) if end <= hours.end_time => end,
            _ => break,
        };

        if !grid.hits_break(start, end) {
            let request = AppointmentRequest {
                client_id: Uuid::nil(),
                service_id: Uuid::nil(),
                professional_id,
                date,
                start_time: start,
                service_duration_minutes: duration_minutes,
            };
            let slot = match validator.validate(&request, Some(hours), existing, now)? {
                Verdict::Accepted { end_time } => SlotAvailability {
                    start_time: start,
                    end_time,
                    available: true,
                    rejection: None,
                },
                Verdict::Rejected(rejection) => SlotAvailability {
                    start_time: start,
                    end_time: end,
                    available: false,
                    rejection: Some(rejection),
                },
            };
            slots.push(slot);
        }

        cursor = start.checked_add_minutes(step);
    }

    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::types::{weekday_index, AppointmentStatus, BookingPolicy};
    use time::macros::{date, datetime};

    const NOW: PrimitiveDateTime = datetime!(2026 - 10 - 16 08:00);
    const DAY: Date = date!(2026 - 10 - 20);

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn pro() -> Uuid {
        Uuid::from_u128(7)
    }

    fn hours(open: &str, close: &str) -> WorkingHours {
        WorkingHours::open(weekday_index(DAY), t(open), t(close))
    }

    fn starts(slots: &[SlotAvailability], available: bool) -> Vec<String> {
        slots
            .iter()
            .filter(|s| s.available == available)
            .map(|s| s.start_time.to_string())
            .collect()
    }

    #[test]
    fn lays_out_grid_until_the_service_no_longer_fits() {
        let slots = available_slots(
            &SlotValidator::default(),
            pro(),
            DAY,
            60,
            Some(&hours("09:00", "11:00")),
            &[],
            &SlotGrid::default(),
            NOW,
        )
        .unwrap();
        assert_eq!(starts(&slots, true), vec!["09:00", "09:30", "10:00"]);
    }

    #[test]
    fn marks_conflicting_slots_unavailable() {
        let existing = [ExistingAppointment {
            id: None,
            professional_id: pro(),
            date: DAY,
            start_time: t("10:00"),
            end_time: t("11:00"),
            status: AppointmentStatus::Confirmed,
        }];
        let slots = available_slots(
            &SlotValidator::default(),
            pro(),
            DAY,
            30,
            Some(&hours("09:00", "12:00")),
            &existing,
            &SlotGrid::default(),
            NOW,
        )
        .unwrap();

        assert_eq!(starts(&slots, true), vec!["09:00", "09:30", "11:00", "11:30"]);
        assert_eq!(starts(&slots, false), vec!["10:00", "10:30"]);
        assert!(slots
            .iter()
            .filter(|s| !s.available)
            .all(|s| s.rejection.as_ref().is_some_and(Rejection::is_conflict)));
    }

    #[test]
    fn skips_slots_overlapping_the_break() {
        let grid = SlotGrid {
            interval_minutes: 60,
            break_start: Some(t("12:00")),
            break_end: Some(t("13:00")),
        };
        let slots = available_slots(
            &SlotValidator::default(),
            pro(),
            DAY,
            60,
            Some(&hours("10:00", "15:00")),
            &[],
            &grid,
            NOW,
        )
        .unwrap();
        assert_eq!(starts(&slots, true), vec!["10:00", "11:00", "13:00", "14:00"]);
    }

    #[test]
    fn closed_and_past_days_have_no_slots() {
        let validator = SlotValidator::default();
        let closed = WorkingHours::closed(weekday_index(DAY));
        let none = available_slots(
            &validator,
            pro(),
            DAY,
            30,
            Some(&closed),
            &[],
            &SlotGrid::default(),
            NOW,
        )
        .unwrap();
        assert!(none.is_empty());

        let missing = available_slots(
            &validator,
            pro(),
            DAY,
            30,
            None,
            &[],
            &SlotGrid::default(),
            NOW,
        )
        .unwrap();
        assert!(missing.is_empty());

        let past = date!(2026 - 10 - 13);
        let past_hours = WorkingHours::open(weekday_index(past), t("09:00"), t("18:00"));
        let gone = available_slots(
            &validator,
            pro(),
            past,
            30,
            Some(&past_hours),
            &[],
            &SlotGrid::default(),
            NOW,
        )
        .unwrap();
        assert!(gone.is_empty());
    }

    #[test]
    fn same_day_lead_time_hides_early_slots() {
        let validator = SlotValidator::new(BookingPolicy {
            min_lead_minutes: 90,
            max_days_ahead: None,
        });
        let today = NOW.date();
        let hours = WorkingHours::open(weekday_index(today), t("08:00"), t("11:00"));
        let slots = available_slots(
            &validator,
            pro(),
            today,
            30,
            Some(&hours),
            &[],
            &SlotGrid::default(),
            NOW,
        )
        .unwrap();
        assert_eq!(starts(&slots, true), vec!["09:30", "10:00", "10:30"]);
        assert_eq!(starts(&slots, false), vec!["08:00", "08:30", "09:00"]);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let result = available_slots(
            &SlotValidator::default(),
            pro(),
            DAY,
            0,
            Some(&hours("09:00", "18:00")),
            &[],
            &SlotGrid::default(),
            NOW,
        );
        assert_eq!(result, Err(SchedulingError::InvalidDuration));
    }
}
