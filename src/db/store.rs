use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use super::error::DatabaseResult;
use super::models::{Appointment, AppointmentFilter, NewAppointment, NewService, Service};
use crate::scheduling::{AppointmentStatus, ExistingAppointment, WorkingHours};

/// Persistence collaborator of the scheduling handlers.
///
/// Implementations must make [`SchedulingStore::insert_appointment`] atomic
/// with respect to overlap: two concurrent inserts for overlapping ranges of
/// the same professional and date must not both succeed, even when both
/// passed validation against the same stale appointment list. The loser
/// gets [`super::DatabaseError::SlotTaken`].
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    async fn ping(&self) -> DatabaseResult<()>;

    async fn create_service(&self, new: NewService) -> DatabaseResult<Service>;

    async fn find_service(&self, id: Uuid) -> DatabaseResult<Option<Service>>;

    async fn list_services(&self) -> DatabaseResult<Vec<Service>>;

    async fn list_working_hours(&self) -> DatabaseResult<Vec<WorkingHours>>;

    async fn working_hours_for(&self, day_of_week: u8) -> DatabaseResult<Option<WorkingHours>>;

    async fn upsert_working_hours(&self, hours: WorkingHours) -> DatabaseResult<WorkingHours>;

    /// Every appointment of `professional_id` on `date`, any status.
    async fn appointments_for(
        &self,
        professional_id: Uuid,
        date: Date,
    ) -> DatabaseResult<Vec<ExistingAppointment>>;

    /// Matching appointments, newest date and start time first.
    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> DatabaseResult<Vec<Appointment>>;

    async fn find_appointment(&self, id: Uuid) -> DatabaseResult<Option<Appointment>>;

    /// Stores `new` as `PENDING` unless it overlaps a blocking appointment.
    async fn insert_appointment(&self, new: NewAppointment) -> DatabaseResult<Appointment>;

    async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> DatabaseResult<Appointment>;
}
