//! Appointment scheduling rules.
//!
//! Everything here is pure: callers fetch working hours and existing
//! appointments, hand them in as plain data and get a [`Verdict`] back.
//! Persisting an accepted request atomically is the store's job.

mod availability;
mod error;
mod time_of_day;
mod types;
mod validator;

pub use availability::{available_slots, SlotAvailability, SlotGrid};
pub use error::SchedulingError;
pub use time_of_day::TimeOfDay;
pub use types::{
    overlaps, weekday_index, AppointmentRequest, AppointmentStatus, BookingPolicy,
    ExistingAppointment, WorkingHours,
};
pub use validator::{Rejection, SlotValidator, Verdict};
