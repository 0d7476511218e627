use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use time::Date;
use uuid::Uuid;

use crate::db::models::{Appointment, AppointmentFilter, AppointmentRow, NewAppointment};
use crate::db::DatabaseError;
use crate::scheduling::{AppointmentStatus, ExistingAppointment};

const APPOINTMENT_COLUMNS: &str = "id, client_id, service_id, professional_id, date, \
     start_time, end_time, status, notes, created_at, updated_at";

pub struct AppointmentRepository;

impl AppointmentRepository {
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        new: &NewAppointment,
    ) -> Result<Appointment, DatabaseError> {
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            r#"
            INSERT INTO appointments
                (id, client_id, service_id, professional_id, date,
                 start_time, end_time, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(new.client_id)
        .bind(new.service_id)
        .bind(new.professional_id)
        .bind(new.date)
        .bind(new.start_time.to_time())
        .bind(new.end_time.to_time())
        .bind(AppointmentStatus::Pending.as_str())
        .bind(new.notes.as_deref())
        .fetch_one(&mut **tx)
        .await?;

        row.try_into()
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Appointment>, DatabaseError> {
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        row.map(Appointment::try_from).transpose()
    }

    pub async fn for_professional_on(
        pool: &PgPool,
        professional_id: Uuid,
        date: Date,
    ) -> Result<Vec<ExistingAppointment>, DatabaseError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS}
            FROM appointments
            WHERE professional_id = $1 AND date = $2
            ORDER BY start_time
            "#
        ))
        .bind(professional_id)
        .bind(date)
        .fetch_all(pool)
        .await?;

        rows.into_iter()
            .map(|row| Appointment::try_from(row).map(|a| a.as_existing()))
            .collect()
    }

    pub async fn list(
        pool: &PgPool,
        filter: &AppointmentFilter,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE TRUE"
        ));
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(professional_id) = filter.professional_id {
            query.push(" AND professional_id = ").push_bind(professional_id);
        }
        if let Some(client_id) = filter.client_id {
            query.push(" AND client_id = ").push_bind(client_id);
        }
        if let Some(from) = filter.date_from {
            query.push(" AND date >= ").push_bind(from);
        }
        if let Some(to) = filter.date_to {
            query.push(" AND date <= ").push_bind(to);
        }
        query.push(" ORDER BY date DESC, start_time DESC");

        let rows = query.build_query_as::<AppointmentRow>().fetch_all(pool).await?;
        rows.into_iter().map(Appointment::try_from).collect()
    }

    pub async fn update_status(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, DatabaseError> {
        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM appointments WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;
        let current: AppointmentStatus = current
            .ok_or(DatabaseError::NotFound)?
            .parse()
            .map_err(DatabaseError::InvalidInput)?;

        if !current.can_transition_to(status) {
            return Err(DatabaseError::InvalidTransition { from: current, to: status });
        }

        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            r#"
            UPDATE appointments
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(status.as_str())
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;

        row.try_into()
    }
}
