use serde::Serialize;
use time::{Date, Duration, PrimitiveDateTime};
use uuid::Uuid;

use super::error::SchedulingError;
use super::time_of_day::TimeOfDay;
use super::types::{
    overlaps, weekday_index, AppointmentRequest, BookingPolicy, ExistingAppointment, WorkingHours,
};

/// Why a request cannot be booked. Each variant serializes as
/// `{"reason": CODE, "detail": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rejection {
    #[serde(rename_all = "camelCase")]
    PastDate { date: Date, today: Date },

    #[serde(rename_all = "camelCase")]
    LeadTimeTooShort {
        earliest_date: Date,
        earliest_time: TimeOfDay,
    },

    #[serde(rename_all = "camelCase")]
    BeyondBookingHorizon { last_bookable_date: Date },

    #[serde(rename_all = "camelCase")]
    SalonClosed { day_of_week: u8 },

    #[serde(rename_all = "camelCase")]
    OutsideBusinessHours { opens_at: TimeOfDay, closes_at: TimeOfDay },

    #[serde(rename_all = "camelCase")]
    SlotConflict {
        appointment_id: Option<Uuid>,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
    },
}

impl Rejection {
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::PastDate { .. } => "PAST_DATE",
            Rejection::LeadTimeTooShort { .. } => "LEAD_TIME_TOO_SHORT",
            Rejection::BeyondBookingHorizon { .. } => "BEYOND_BOOKING_HORIZON",
            Rejection::SalonClosed { .. } => "SALON_CLOSED",
            Rejection::OutsideBusinessHours { .. } => "OUTSIDE_BUSINESS_HOURS",
            Rejection::SlotConflict { .. } => "SLOT_CONFLICT",
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Rejection::SlotConflict { .. })
    }
}

/// Outcome of validating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted { end_time: TimeOfDay },
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Accepted { .. } => None,
            Verdict::Rejected(rejection) => Some(rejection),
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum VerdictBody<'a> {
    Accepted {
        ok: bool,
        #[serde(rename = "endTime")]
        end_time: TimeOfDay,
    },
    Rejected {
        ok: bool,
        #[serde(flatten)]
        rejection: &'a Rejection,
    },
}

impl Serialize for Verdict {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = match self {
            Verdict::Accepted { end_time } => VerdictBody::Accepted {
                ok: true,
                end_time: *end_time,
            },
            Verdict::Rejected(rejection) => VerdictBody::Rejected { ok: false, rejection },
        };
        body.serialize(serializer)
    }
}

/// Decides whether a requested appointment can be booked.
///
/// Checks run in a fixed order and the first failure wins: past date,
/// lead time, booking horizon, salon closed, business hours, conflicts.
/// The validator holds no state besides its policy and performs no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotValidator {
    policy: BookingPolicy,
}

impl SlotValidator {
    pub fn new(policy: BookingPolicy) -> Self {
        Self { policy }
    }

    /// `working_hours` is the row for the request's weekday, if any;
    /// `existing` may contain appointments of other professionals or dates,
    /// which are ignored. `now` is the salon's local wall-clock time.
    pub fn validate(
        &self,
        request: &AppointmentRequest,
        working_hours: Option<&WorkingHours>,
        existing: &[ExistingAppointment],
        now: PrimitiveDateTime,
    ) -> Result<Verdict, SchedulingError> {
        let end_time = request.end_time()?;
        let day_of_week = weekday_index(request.date);

        if let Some(hours) = working_hours {
            hours.check()?;
            if hours.day_of_week != day_of_week {
                return Err(SchedulingError::WeekdayMismatch {
                    expected: day_of_week,
                    supplied: hours.day_of_week,
                });
            }
        }

        if let Some(rejection) = self.check_calendar(request, now) {
            return Ok(Verdict::Rejected(rejection));
        }

        let hours = match working_hours {
            Some(hours) if hours.is_open => hours,
            _ => return Ok(Verdict::Rejected(Rejection::SalonClosed { day_of_week })),
        };

        if request.start_time < hours.start_time || end_time > hours.end_time {
            return Ok(Verdict::Rejected(Rejection::OutsideBusinessHours {
                opens_at: hours.start_time,
                closes_at: hours.end_time,
            }));
        }

        let conflict = existing
            .iter()
            .filter(|e| e.blocks(request.professional_id, request.date))
            .find(|e| overlaps(request.start_time, end_time, e.start_time, e.end_time));

        if let Some(e) = conflict {
            return Ok(Verdict::Rejected(Rejection::SlotConflict {
                appointment_id: e.id,
                start_time: e.start_time,
                end_time: e.end_time,
            }));
        }

        Ok(Verdict::Accepted { end_time })
    }

    fn check_calendar(
        &self,
        request: &AppointmentRequest,
        now: PrimitiveDateTime,
    ) -> Option<Rejection> {
        let today = now.date();
        if request.date < today {
            return Some(Rejection::PastDate {
                date: request.date,
                today,
            });
        }

        if self.policy.min_lead_minutes > 0 {
            let requested = PrimitiveDateTime::new(request.date, request.start_time.to_time());
            let lead = Duration::minutes(self.policy.min_lead_minutes as i64);
            let earliest = now.saturating_add(lead);
            if requested < earliest {
                return Some(Rejection::LeadTimeTooShort {
                    earliest_date: earliest.date(),
                    earliest_time: TimeOfDay::from(earliest.time()),
                });
            }
        }

        if let Some(days) = self.policy.max_days_ahead {
            let last_bookable_date = today.saturating_add(Duration::days(days as i64));
            if request.date > last_bookable_date {
                return Some(Rejection::BeyondBookingHorizon { last_bookable_date });
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::types::AppointmentStatus;
    use time::macros::{date, datetime};

    // Friday 2026-10-16, 08:00 salon time.
    const NOW: PrimitiveDateTime = datetime!(2026 - 10 - 16 08:00);
    // Tuesday.
    const DAY: Date = date!(2026 - 10 - 20);

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn professional() -> Uuid {
        Uuid::from_u128(7)
    }

    fn request(date: Date, start: &str, minutes: u32) -> AppointmentRequest {
        AppointmentRequest {
            client_id: Uuid::from_u128(1),
            service_id: Uuid::from_u128(2),
            professional_id: professional(),
            date,
            start_time: t(start),
            service_duration_minutes: minutes,
        }
    }

    fn hours_for(date: Date) -> WorkingHours {
        WorkingHours::open(weekday_index(date), t("09:00"), t("18:00"))
    }

    fn booked(start: &str, end: &str, status: AppointmentStatus) -> ExistingAppointment {
        ExistingAppointment {
            id: Some(Uuid::from_u128(99)),
            professional_id: professional(),
            date: DAY,
            start_time: t(start),
            end_time: t(end),
            status,
        }
    }

    fn validate(request: &AppointmentRequest, existing: &[ExistingAppointment]) -> Verdict {
        SlotValidator::default()
            .validate(request, Some(&hours_for(request.date)), existing, NOW)
            .unwrap()
    }

    #[test]
    fn accepts_free_slot_and_reports_end_time() {
        let verdict = validate(&request(DAY, "14:00", 45), &[]);
        assert_eq!(verdict, Verdict::Accepted { end_time: t("14:45") });
    }

    #[test]
    fn worked_example_from_the_booking_rules() {
        let existing = [booked("10:00", "11:00", AppointmentStatus::Confirmed)];

        let overlap = validate(&request(DAY, "10:30", 45), &existing);
        assert_eq!(
            overlap,
            Verdict::Rejected(Rejection::SlotConflict {
                appointment_id: Some(Uuid::from_u128(99)),
                start_time: t("10:00"),
                end_time: t("11:00"),
            })
        );

        let back_to_back = validate(&request(DAY, "11:00", 30), &existing);
        assert_eq!(back_to_back, Verdict::Accepted { end_time: t("11:30") });

        let early = validate(&request(DAY, "08:30", 45), &existing);
        assert_eq!(
            early,
            Verdict::Rejected(Rejection::OutsideBusinessHours {
                opens_at: t("09:00"),
                closes_at: t("18:00"),
            })
        );

        let yesterday = date!(2026 - 10 - 15);
        let past = validate(&request(yesterday, "10:00", 30), &existing);
        assert_eq!(past.rejection().map(Rejection::code), Some("PAST_DATE"));
    }

    #[test]
    fn today_is_not_past_even_after_the_start_time() {
        let late = datetime!(2026 - 10 - 16 17:00);
        let verdict = SlotValidator::default()
            .validate(&request(NOW.date(), "09:00", 30), Some(&hours_for(NOW.date())), &[], late)
            .unwrap();
        assert!(verdict.is_accepted());
    }

    #[test]
    fn past_date_wins_over_closed_day() {
        let sunday = date!(2026 - 10 - 11);
        let verdict = SlotValidator::default()
            .validate(&request(sunday, "10:00", 30), Some(&WorkingHours::closed(0)), &[], NOW)
            .unwrap();
        assert!(matches!(verdict, Verdict::Rejected(Rejection::PastDate { .. })));
    }

    #[test]
    fn missing_or_closed_hours_mean_salon_closed() {
        let validator = SlotValidator::default();
        let r = request(DAY, "10:00", 30);

        let missing = validator.validate(&r, None, &[], NOW).unwrap();
        assert_eq!(missing, Verdict::Rejected(Rejection::SalonClosed { day_of_week: 2 }));

        let closed = validator.validate(&r, Some(&WorkingHours::closed(2)), &[], NOW).unwrap();
        assert_eq!(closed, Verdict::Rejected(Rejection::SalonClosed { day_of_week: 2 }));
    }

    #[test]
    fn end_must_fit_before_closing() {
        assert!(validate(&request(DAY, "17:30", 30), &[]).is_accepted());
        let over = validate(&request(DAY, "17:30", 31), &[]);
        assert_eq!(over.rejection().map(Rejection::code), Some("OUTSIDE_BUSINESS_HOURS"));
    }

    #[test]
    fn closing_bounds_win_over_conflicts() {
        let existing = [booked("17:00", "18:00", AppointmentStatus::Pending)];
        let verdict = validate(&request(DAY, "17:30", 60), &existing);
        assert_eq!(verdict.rejection().map(Rejection::code), Some("OUTSIDE_BUSINESS_HOURS"));
    }

    #[test]
    fn completed_and_cancelled_do_not_block() {
        let existing = [
            booked("10:00", "11:00", AppointmentStatus::Completed),
            booked("10:00", "11:00", AppointmentStatus::Cancelled),
        ];
        assert!(validate(&request(DAY, "10:00", 60), &existing).is_accepted());
    }

    #[test]
    fn other_professionals_and_dates_are_ignored() {
        let mut other_pro = booked("10:00", "11:00", AppointmentStatus::Confirmed);
        other_pro.professional_id = Uuid::from_u128(8);
        let mut other_day = booked("10:00", "11:00", AppointmentStatus::Confirmed);
        other_day.date = date!(2026 - 10 - 21);

        assert!(validate(&request(DAY, "10:00", 60), &[other_pro, other_day]).is_accepted());
    }

    #[test]
    fn contained_and_containing_ranges_conflict() {
        let existing = [booked("10:00", "12:00", AppointmentStatus::Pending)];
        assert!(!validate(&request(DAY, "10:30", 30), &existing).is_accepted());
        assert!(!validate(&request(DAY, "09:00", 240), &existing).is_accepted());
        assert!(validate(&request(DAY, "09:00", 60), &existing).is_accepted());
    }

    #[test]
    fn malformed_input_is_an_error_not_a_verdict() {
        let validator = SlotValidator::default();

        let zero = validator.validate(&request(DAY, "10:00", 0), Some(&hours_for(DAY)), &[], NOW);
        assert_eq!(zero, Err(SchedulingError::InvalidDuration));

        let midnight =
            validator.validate(&request(DAY, "23:30", 45), Some(&hours_for(DAY)), &[], NOW);
        assert!(matches!(midnight, Err(SchedulingError::CrossesMidnight { .. })));

        let wrong_day = WorkingHours::open(3, t("09:00"), t("18:00"));
        let mismatch = validator.validate(&request(DAY, "10:00", 30), Some(&wrong_day), &[], NOW);
        assert_eq!(mismatch, Err(SchedulingError::WeekdayMismatch { expected: 2, supplied: 3 }));

        let inverted = WorkingHours::open(2, t("18:00"), t("09:00"));
        let bad_hours = validator.validate(&request(DAY, "10:00", 30), Some(&inverted), &[], NOW);
        assert!(matches!(bad_hours, Err(SchedulingError::InvalidWorkingHours { .. })));
    }

    #[test]
    fn lead_time_policy_applies_to_same_day_requests() {
        let validator = SlotValidator::new(BookingPolicy {
            min_lead_minutes: 120,
            max_days_ahead: None,
        });
        let today = NOW.date();
        let hours = hours_for(today);

        let too_soon = validator
            .validate(&request(today, "09:30", 30), Some(&hours), &[], NOW)
            .unwrap();
        assert_eq!(
            too_soon,
            Verdict::Rejected(Rejection::LeadTimeTooShort {
                earliest_date: today,
                earliest_time: t("10:00"),
            })
        );

        let exactly = validator
            .validate(&request(today, "10:00", 30), Some(&hours), &[], NOW)
            .unwrap();
        assert!(exactly.is_accepted());
    }

    #[test]
    fn horizon_policy_limits_far_future_dates() {
        let validator = SlotValidator::new(BookingPolicy {
            min_lead_minutes: 0,
            max_days_ahead: Some(30),
        });
        let last = date!(2026 - 11 - 15);
        let beyond = date!(2026 - 11 - 17);

        let ok = validator
            .validate(&request(last, "10:00", 30), Some(&hours_for(last)), &[], NOW)
            .unwrap();
        assert!(ok.is_accepted());

        let far = validator
            .validate(&request(beyond, "10:00", 30), Some(&hours_for(beyond)), &[], NOW)
            .unwrap();
        assert_eq!(
            far,
            Verdict::Rejected(Rejection::BeyondBookingHorizon { last_bookable_date: last })
        );
    }

    #[test]
    fn input_errors_take_precedence_over_past_date() {
        let yesterday = date!(2026 - 10 - 15);
        let validator = SlotValidator::default();

        let late = validator.validate(
            &request(yesterday, "23:30", 60),
            Some(&hours_for(yesterday)),
            &[],
            NOW,
        );
        assert!(matches!(late, Err(SchedulingError::CrossesMidnight { .. })));

        let wrong_day = hours_for(DAY);
        let mismatch =
            validator.validate(&request(yesterday, "10:00", 30), Some(&wrong_day), &[], NOW);
        assert!(matches!(mismatch, Err(SchedulingError::WeekdayMismatch { .. })));
    }

    #[test]
    fn past_date_is_reported_before_closed_or_conflicting_slots() {
        let yesterday = date!(2026 - 10 - 15);
        let existing = [ExistingAppointment {
            date: yesterday,
            ..booked("10:00", "11:00", AppointmentStatus::Confirmed)
        }];

        let closed = WorkingHours::closed(weekday_index(yesterday));
        let verdict = SlotValidator::default()
            .validate(&request(yesterday, "10:00", 60), Some(&closed), &existing, NOW)
            .unwrap();
        assert!(matches!(verdict, Verdict::Rejected(Rejection::PastDate { .. })));

        let verdict = SlotValidator::default()
            .validate(&request(yesterday, "10:00", 60), None, &existing, NOW)
            .unwrap();
        assert!(matches!(verdict, Verdict::Rejected(Rejection::PastDate { .. })));
    }

    #[test]
    fn verdict_serializes_to_the_wire_contract() {
        let accepted = serde_json::to_value(Verdict::Accepted { end_time: t("11:30") }).unwrap();
        assert_eq!(accepted, serde_json::json!({ "ok": true, "endTime": "11:30" }));

        let conflict = serde_json::to_value(Verdict::Rejected(Rejection::SlotConflict {
            appointment_id: None,
            start_time: t("10:00"),
            end_time: t("11:00"),
        }))
        .unwrap();
        assert_eq!(
            conflict,
            serde_json::json!({
                "ok": false,
                "reason": "SLOT_CONFLICT",
                "detail": { "appointmentId": null, "startTime": "10:00", "endTime": "11:00" }
            })
        );

        let hours = serde_json::to_value(Verdict::Rejected(Rejection::OutsideBusinessHours {
            opens_at: t("09:00"),
            closes_at: t("18:00"),
        }))
        .unwrap();
        assert_eq!(hours["reason"], "OUTSIDE_BUSINESS_HOURS");
        assert_eq!(hours["detail"]["opensAt"], "09:00");
        assert_eq!(hours["detail"]["closesAt"], "18:00");
    }
}
