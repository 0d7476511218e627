use sqlx::PgPool;

use crate::db::models::WorkingHoursRow;
use crate::db::DatabaseError;
use crate::scheduling::WorkingHours;

pub struct WorkingHoursRepository;

impl WorkingHoursRepository {
    pub async fn list(pool: &PgPool) -> Result<Vec<WorkingHours>, DatabaseError> {
        let rows = sqlx::query_as::<_, WorkingHoursRow>(
            "SELECT day_of_week, is_open, start_time, end_time \
             FROM working_hours ORDER BY day_of_week",
        )
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(WorkingHours::try_from).collect()
    }

    pub async fn get_for_day(
        pool: &PgPool,
        day_of_week: u8,
    ) -> Result<Option<WorkingHours>, DatabaseError> {
        let row = sqlx::query_as::<_, WorkingHoursRow>(
            "SELECT day_of_week, is_open, start_time, end_time \
             FROM working_hours WHERE day_of_week = $1",
        )
        .bind(day_of_week as i16)
        .fetch_optional(pool)
        .await?;

        row.map(WorkingHours::try_from).transpose()
    }

    pub async fn upsert(
        pool: &PgPool,
        hours: &WorkingHours,
    ) -> Result<WorkingHours, DatabaseError> {
        let row = sqlx::query_as::<_, WorkingHoursRow>(
            r#"
            INSERT INTO working_hours (day_of_week, is_open, start_time, end_time)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (day_of_week) DO UPDATE
            SET is_open = EXCLUDED.is_open,
                start_time = EXCLUDED.start_time,
                end_time = EXCLUDED.end_time
            RETURNING day_of_week, is_open, start_time, end_time
            "#,
        )
        .bind(hours.day_of_week as i16)
        .bind(hours.is_open)
        .bind(hours.start_time.to_time())
        .bind(hours.end_time.to_time())
        .fetch_one(pool)
        .await?;

        row.try_into()
    }
}
