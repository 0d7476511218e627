use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

/// A bookable salon service. Only its duration matters for scheduling.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Service {
    pub fn duration(&self) -> u32 {
        self.duration_minutes.max(0) as u32
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    #[validate(length(min = 1, max = 120, message = "Name must have between 1 and 120 characters"))]
    pub name: String,
    #[validate(range(min = 1, max = 720, message = "Duration must be between 1 and 720 minutes"))]
    pub duration_minutes: i32,
}
