use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{NewService, Service};

pub struct ServiceRepository;

impl ServiceRepository {
    pub async fn create(pool: &PgPool, new: &NewService) -> Result<Service, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (id, name, duration_minutes)
            VALUES ($1, $2, $3)
            RETURNING id, name, duration_minutes, active, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&new.name)
        .bind(new.duration_minutes)
        .fetch_one(pool)
        .await
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Service>, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            "SELECT id, name, duration_minutes, active, created_at FROM services WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Service>, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            "SELECT id, name, duration_minutes, active, created_at FROM services ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }
}
