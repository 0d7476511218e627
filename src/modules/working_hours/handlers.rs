use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::app_state::AppState;
use crate::db::UpdateWorkingHours;
use crate::error::AppResult;
use crate::scheduling::WorkingHours;

pub async fn list_working_hours(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<WorkingHours>>> {
    let hours = state.store.list_working_hours().await?;
    Ok(Json(hours))
}

/// Replace the hours of one weekday (0 = Sunday).
pub async fn update_working_hours(
    State(state): State<AppState>,
    Path(day): Path<u8>,
    Json(payload): Json<UpdateWorkingHours>,
) -> AppResult<Json<WorkingHours>> {
    let hours = payload.for_day(day);
    hours.check()?;

    let saved = state.store.upsert_working_hours(hours).await?;
    tracing::info!(
        day_of_week = saved.day_of_week,
        is_open = saved.is_open,
        start_time = %saved.start_time,
        end_time = %saved.end_time,
        "Working hours updated"
    );

    Ok(Json(saved))
}
