use async_trait::async_trait;
use std::collections::HashMap;
use time::{Date, OffsetDateTime};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::{DatabaseError, DatabaseResult};
use super::models::{Appointment, AppointmentFilter, NewAppointment, NewService, Service};
use super::store::SchedulingStore;
use crate::scheduling::{overlaps, AppointmentStatus, ExistingAppointment, WorkingHours};

#[derive(Default)]
struct Tables {
    services: HashMap<Uuid, Service>,
    working_hours: HashMap<u8, WorkingHours>,
    appointments: HashMap<Uuid, Appointment>,
}

/// Process-local store for development and tests.
///
/// The overlap re-check and the insert share one write lock, which gives
/// the same guarantee the exclusion constraint gives in Postgres.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SchedulingStore for InMemoryStore {
    async fn ping(&self) -> DatabaseResult<()> {
        Ok(())
    }

    async fn create_service(&self, new: NewService) -> DatabaseResult<Service> {
        let mut tables = self.tables.write().await;
        // Same rule as the UNIQUE constraint on services.name
        if tables.services.values().any(|s| s.name == new.name) {
            return Err(DatabaseError::Duplicate);
        }
        let service = Service {
            id: Uuid::now_v7(),
            name: new.name,
            duration_minutes: new.duration_minutes,
            active: true,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.services.insert(service.id, service.clone());
        Ok(service)
    }

    async fn find_service(&self, id: Uuid) -> DatabaseResult<Option<Service>> {
        Ok(self.tables.read().await.services.get(&id).cloned())
    }

    async fn list_services(&self) -> DatabaseResult<Vec<Service>> {
        let mut services: Vec<Service> =
            self.tables.read().await.services.values().cloned().collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(services)
    }

    async fn list_working_hours(&self) -> DatabaseResult<Vec<WorkingHours>> {
        let mut hours: Vec<WorkingHours> =
            self.tables.read().await.working_hours.values().copied().collect();
        hours.sort_by_key(|h| h.day_of_week);
        Ok(hours)
    }

    async fn working_hours_for(&self, day_of_week: u8) -> DatabaseResult<Option<WorkingHours>> {
        Ok(self.tables.read().await.working_hours.get(&day_of_week).copied())
    }

    async fn upsert_working_hours(&self, hours: WorkingHours) -> DatabaseResult<WorkingHours> {
        hours
            .check()
            .map_err(|e| DatabaseError::InvalidInput(e.to_string()))?;
        self.tables.write().await.working_hours.insert(hours.day_of_week, hours);
        Ok(hours)
    }

    async fn appointments_for(
        &self,
        professional_id: Uuid,
        date: Date,
    ) -> DatabaseResult<Vec<ExistingAppointment>> {
        let tables = self.tables.read().await;
        let mut existing: Vec<ExistingAppointment> = tables
            .appointments
            .values()
            .filter(|a| a.professional_id == professional_id && a.date == date)
            .map(Appointment::as_existing)
            .collect();
        existing.sort_by_key(|e| e.start_time);
        Ok(existing)
    }

    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> DatabaseResult<Vec<Appointment>> {
        let tables = self.tables.read().await;
        let mut appointments: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        appointments.sort_by(|a, b| (b.date, b.start_time).cmp(&(a.date, a.start_time)));
        Ok(appointments)
    }

    async fn find_appointment(&self, id: Uuid) -> DatabaseResult<Option<Appointment>> {
        Ok(self.tables.read().await.appointments.get(&id).cloned())
    }

    async fn insert_appointment(&self, new: NewAppointment) -> DatabaseResult<Appointment> {
        let mut tables = self.tables.write().await;

        let conflict = tables
            .appointments
            .values()
            .map(Appointment::as_existing)
            .filter(|e| e.blocks(new.professional_id, new.date))
            .find(|e| overlaps(new.start_time, new.end_time, e.start_time, e.end_time));
        if let Some(conflict) = conflict {
            return Err(DatabaseError::SlotTaken {
                conflict: Some(Box::new(conflict)),
            });
        }

        let now = OffsetDateTime::now_utc();
        let appointment = Appointment {
            id: Uuid::now_v7(),
            client_id: new.client_id,
            service_id: new.service_id,
            professional_id: new.professional_id,
            date: new.date,
            start_time: new.start_time,
            end_time: new.end_time,
            status: AppointmentStatus::Pending,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };
        tables.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> DatabaseResult<Appointment> {
        let mut tables = self.tables.write().await;
        let appointment = tables.appointments.get_mut(&id).ok_or(DatabaseError::NotFound)?;
        if !appointment.status.can_transition_to(status) {
            return Err(DatabaseError::InvalidTransition {
                from: appointment.status,
                to: status,
            });
        }
        appointment.status = status;
        appointment.updated_at = OffsetDateTime::now_utc();
        Ok(appointment.clone())
    }
}
