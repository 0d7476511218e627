use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::error::{sqlstate, DatabaseError, DatabaseResult, EXCLUSION_VIOLATION, UNIQUE_VIOLATION};
use super::models::{Appointment, AppointmentFilter, NewAppointment, NewService, Service};
use super::repositories::{AppointmentRepository, ServiceRepository, WorkingHoursRepository};
use super::store::SchedulingStore;
use crate::scheduling::{overlaps, AppointmentStatus, ExistingAppointment, WorkingHours};

/// PostgreSQL-backed store. Overlap atomicity comes from the
/// `appointments_no_overlap` exclusion constraint.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_conflict(&self, new: &NewAppointment) -> Option<ExistingAppointment> {
        let lookup =
            AppointmentRepository::for_professional_on(&self.pool, new.professional_id, new.date)
                .await;
        let existing = match lookup {
            Ok(existing) => existing,
            Err(e) => {
                tracing::warn!(
                    professional_id = %new.professional_id,
                    date = %new.date,
                    "Failed to look up the conflicting appointment: {}",
                    e
                );
                return None;
            }
        };
        existing
            .into_iter()
            .filter(|e| e.blocks(new.professional_id, new.date))
            .find(|e| overlaps(new.start_time, new.end_time, e.start_time, e.end_time))
    }
}

#[async_trait]
impl SchedulingStore for PgStore {
    async fn ping(&self) -> DatabaseResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_service(&self, new: NewService) -> DatabaseResult<Service> {
        ServiceRepository::create(&self.pool, &new).await.map_err(|e| {
            if sqlstate(&e).as_deref() == Some(UNIQUE_VIOLATION) {
                DatabaseError::Duplicate
            } else {
                DatabaseError::Sqlx(e)
            }
        })
    }

    async fn find_service(&self, id: Uuid) -> DatabaseResult<Option<Service>> {
        Ok(ServiceRepository::get_by_id(&self.pool, id).await?)
    }

    async fn list_services(&self) -> DatabaseResult<Vec<Service>> {
        Ok(ServiceRepository::list(&self.pool).await?)
    }

    async fn list_working_hours(&self) -> DatabaseResult<Vec<WorkingHours>> {
        WorkingHoursRepository::list(&self.pool).await
    }

    async fn working_hours_for(&self, day_of_week: u8) -> DatabaseResult<Option<WorkingHours>> {
        WorkingHoursRepository::get_for_day(&self.pool, day_of_week).await
    }

    async fn upsert_working_hours(&self, hours: WorkingHours) -> DatabaseResult<WorkingHours> {
        hours
            .check()
            .map_err(|e| DatabaseError::InvalidInput(e.to_string()))?;
        WorkingHoursRepository::upsert(&self.pool, &hours).await
    }

    async fn appointments_for(
        &self,
        professional_id: Uuid,
        date: Date,
    ) -> DatabaseResult<Vec<ExistingAppointment>> {
        AppointmentRepository::for_professional_on(&self.pool, professional_id, date).await
    }

    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> DatabaseResult<Vec<Appointment>> {
        AppointmentRepository::list(&self.pool, filter).await
    }

    async fn find_appointment(&self, id: Uuid) -> DatabaseResult<Option<Appointment>> {
        AppointmentRepository::get_by_id(&self.pool, id).await
    }

    async fn insert_appointment(&self, new: NewAppointment) -> DatabaseResult<Appointment> {
        let mut tx = self.pool.begin().await?;

        match AppointmentRepository::insert(&mut tx, &new).await {
            Ok(appointment) => {
                tx.commit().await?;
                Ok(appointment)
            }
            Err(DatabaseError::Sqlx(e)) if sqlstate(&e).as_deref() == Some(EXCLUSION_VIOLATION) => {
                tx.rollback().await?;
                let conflict = self.find_conflict(&new).await.map(Box::new);
                Err(DatabaseError::SlotTaken { conflict })
            }
            Err(e) => Err(e),
        }
    }

    async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> DatabaseResult<Appointment> {
        let mut tx = self.pool.begin().await?;
        let appointment = AppointmentRepository::update_status(&mut tx, id, status).await?;
        tx.commit().await?;
        Ok(appointment)
    }
}
