use axum::{extract::State, http::StatusCode, response::Json};
use validator::Validate;

use crate::app_state::AppState;
use crate::db::{NewService, Service};
use crate::error::AppResult;

pub async fn list_services(State(state): State<AppState>) -> AppResult<Json<Vec<Service>>> {
    let services = state.store.list_services().await?;
    Ok(Json(services))
}

pub async fn create_service(
    State(state): State<AppState>,
    Json(payload): Json<NewService>,
) -> AppResult<(StatusCode, Json<Service>)> {
    payload.validate()?;

    let service = state.store.create_service(payload).await?;
    tracing::info!(service_id = %service.id, name = %service.name, "Service created");

    Ok((StatusCode::CREATED, Json(service)))
}
