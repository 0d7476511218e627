use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::scheduling::{AppointmentStatus, ExistingAppointment, TimeOfDay};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub professional_id: Uuid,
    pub date: Date,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Appointment {
    pub fn as_existing(&self) -> ExistingAppointment {
        ExistingAppointment {
            id: Some(self.id),
            professional_id: self.professional_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            status: self.status,
        }
    }
}

/// Raw `appointments` row.
#[derive(Debug, sqlx::FromRow)]
pub struct AppointmentRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub professional_id: Uuid,
    pub date: Date,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DatabaseError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(DatabaseError::InvalidInput)?;
        Ok(Appointment {
            id: row.id,
            client_id: row.client_id,
            service_id: row.service_id,
            professional_id: row.professional_id,
            date: row.date,
            start_time: row.start_time.into(),
            end_time: row.end_time.into(),
            status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// An accepted request ready to be stored as `PENDING`.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub professional_id: Uuid,
    pub date: Date,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub notes: Option<String>,
}

impl NewAppointment {
    pub fn as_existing(&self) -> ExistingAppointment {
        ExistingAppointment {
            id: None,
            professional_id: self.professional_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            status: AppointmentStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub professional_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.status.map_or(true, |s| s == appointment.status)
            && self.professional_id.map_or(true, |p| p == appointment.professional_id)
            && self.client_id.map_or(true, |c| c == appointment.client_id)
            && self.date_from.map_or(true, |d| appointment.date >= d)
            && self.date_to.map_or(true, |d| appointment.date <= d)
    }
}
