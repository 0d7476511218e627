use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::{Date, Duration};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::{Appointment, AppointmentFilter, DatabaseError, NewAppointment};
use crate::error::{AppError, AppResult};
use crate::i18n::I18n;
use crate::scheduling::{
    available_slots, weekday_index, AppointmentRequest, AppointmentStatus, Rejection,
    SlotAvailability, TimeOfDay, Verdict,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub professional_id: Uuid,
    pub date: Date,
    pub start_time: String,
    #[validate(length(max = 500, message = "Notes must have at most 500 characters"))]
    pub notes: Option<String>,
}

/// Dry-run input: the raw slot, with the duration given directly.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateSlotRequest {
    pub professional_id: Uuid,
    pub date: Date,
    pub start_time: String,
    pub service_duration_minutes: u32,
    pub client_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub date: Date,
    pub service_id: Option<Uuid>,
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsQuery {
    pub service_id: Option<Uuid>,
    pub duration_minutes: Option<u32>,
    pub from: Option<Date>,
    pub days: Option<u16>,
    pub per_day: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub professional_id: Uuid,
    pub date: Date,
    pub duration_minutes: u32,
    pub slots: Vec<SlotAvailability>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySuggestions {
    pub date: Date,
    pub start_times: Vec<TimeOfDay>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsResponse {
    pub professional_id: Uuid,
    pub duration_minutes: u32,
    pub days: Vec<DaySuggestions>,
}

const MAX_SUGGESTION_DAYS: u16 = 60;

/// Book a slot: look up the service, run the scheduling rules, then insert.
pub async fn create_appointment(
    State(state): State<AppState>,
    i18n: I18n,
    Json(payload): Json<CreateAppointmentRequest>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    payload.validate()?;
    let start_time: TimeOfDay = payload.start_time.parse()?;

    let service = state
        .store
        .find_service(payload.service_id)
        .await?
        .filter(|service| service.active)
        .ok_or_else(|| AppError::NotFound(i18n.get("error-service-not-found")))?;

    let request = AppointmentRequest {
        client_id: payload.client_id,
        service_id: service.id,
        professional_id: payload.professional_id,
        date: payload.date,
        start_time,
        service_duration_minutes: service.duration(),
    };

    let end_time = match evaluate(&state, &request).await? {
        Verdict::Accepted { end_time } => end_time,
        Verdict::Rejected(rejection) => return Err(reject(&i18n, rejection)),
    };

    let new = NewAppointment {
        client_id: request.client_id,
        service_id: request.service_id,
        professional_id: request.professional_id,
        date: request.date,
        start_time: request.start_time,
        end_time,
        notes: payload.notes,
    };

    let appointment = match state.store.insert_appointment(new).await {
        Ok(appointment) => appointment,
        // Lost the race against a concurrent booking that passed validation too
        Err(DatabaseError::SlotTaken { conflict }) => {
            let rejection = match conflict {
                Some(existing) => Rejection::SlotConflict {
                    appointment_id: existing.id,
                    start_time: existing.start_time,
                    end_time: existing.end_time,
                },
                None => Rejection::SlotConflict {
                    appointment_id: None,
                    start_time: request.start_time,
                    end_time,
                },
            };
            return Err(reject(&i18n, rejection));
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(
        appointment_id = %appointment.id,
        professional_id = %appointment.professional_id,
        date = %appointment.date,
        start_time = %appointment.start_time,
        "Appointment created"
    );

    state.publish(
        json!({
            "type": "appointment.created",
            "appointment": &appointment,
        })
        .to_string(),
    );

    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn list_appointments(
    State(state): State<AppState>,
    Query(filter): Query<AppointmentFilter>,
) -> AppResult<Json<Vec<Appointment>>> {
    let appointments = state.store.list_appointments(&filter).await?;
    Ok(Json(appointments))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    i18n: I18n,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Appointment>> {
    state
        .store
        .find_appointment(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(i18n.get("error-appointment-not-found")))
}

pub async fn update_appointment_status(
    State(state): State<AppState>,
    i18n: I18n,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<Appointment>> {
    let appointment = match state.store.update_appointment_status(id, payload.status).await {
        Ok(appointment) => appointment,
        Err(DatabaseError::NotFound) => {
            return Err(AppError::NotFound(i18n.get("error-appointment-not-found")));
        }
        Err(DatabaseError::InvalidTransition { from, to }) => {
            let args = crate::i18n_args! {
                "from" => from.as_str(),
                "to" => to.as_str(),
            };
            return Err(AppError::Conflict(i18n.get_with_args("error-status-transition", &args)));
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(
        appointment_id = %id,
        status = %appointment.status,
        "Appointment status updated"
    );

    state.publish(
        json!({
            "type": "appointment.status_changed",
            "appointment": &appointment,
        })
        .to_string(),
    );

    Ok(Json(appointment))
}

/// Run the scheduling rules without booking anything.
pub async fn validate_slot(
    State(state): State<AppState>,
    Json(payload): Json<ValidateSlotRequest>,
) -> AppResult<Json<Verdict>> {
    let request = AppointmentRequest {
        client_id: payload.client_id.unwrap_or_else(Uuid::nil),
        service_id: payload.service_id.unwrap_or_else(Uuid::nil),
        professional_id: payload.professional_id,
        date: payload.date,
        start_time: payload.start_time.parse()?,
        service_duration_minutes: payload.service_duration_minutes,
    };

    let verdict = evaluate(&state, &request).await?;
    Ok(Json(verdict))
}

pub async fn get_availability(
    State(state): State<AppState>,
    i18n: I18n,
    Path(professional_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    let duration_minutes =
        resolve_duration(&state, &i18n, query.service_id, query.duration_minutes).await?;
    let slots = slots_for_day(&state, professional_id, query.date, duration_minutes).await?;

    Ok(Json(AvailabilityResponse {
        professional_id,
        date: query.date,
        duration_minutes,
        slots,
    }))
}

/// Next free start times over the coming days, capped per day.
pub async fn get_suggestions(
    State(state): State<AppState>,
    i18n: I18n,
    Path(professional_id): Path<Uuid>,
    Query(query): Query<SuggestionsQuery>,
) -> AppResult<Json<SuggestionsResponse>> {
    let duration_minutes =
        resolve_duration(&state, &i18n, query.service_id, query.duration_minutes).await?;
    let from = query.from.unwrap_or_else(|| state.env.scheduling.now().date());
    let days = query.days.unwrap_or(7);
    let per_day = query.per_day.unwrap_or(5);

    if days == 0 || days > MAX_SUGGESTION_DAYS {
        return Err(AppError::BadRequest(format!(
            "days must be between 1 and {}",
            MAX_SUGGESTION_DAYS
        )));
    }
    if per_day == 0 {
        return Err(AppError::BadRequest("perDay must be positive".to_string()));
    }

    let mut suggestions = Vec::new();
    for offset in 0..days {
        let Some(date) = from.checked_add(Duration::days(offset.into())) else {
            break;
        };
        let start_times: Vec<TimeOfDay> =
            slots_for_day(&state, professional_id, date, duration_minutes)
                .await?
                .into_iter()
                .filter(|slot| slot.available)
                .map(|slot| slot.start_time)
                .take(per_day)
                .collect();

        if !start_times.is_empty() {
            suggestions.push(DaySuggestions { date, start_times });
        }
    }

    Ok(Json(SuggestionsResponse {
        professional_id,
        duration_minutes,
        days: suggestions,
    }))
}

/// Fetch the day's working hours and bookings, then ask the validator.
async fn evaluate(state: &AppState, request: &AppointmentRequest) -> AppResult<Verdict> {
    let hours = state.store.working_hours_for(weekday_index(request.date)).await?;
    let existing = state
        .store
        .appointments_for(request.professional_id, request.date)
        .await?;

    let verdict =
        state
            .env
            .scheduling
            .validator()
            .validate(request, hours.as_ref(), &existing, state.env.scheduling.now())?;

    tracing::debug!(
        professional_id = %request.professional_id,
        date = %request.date,
        start_time = %request.start_time,
        accepted = verdict.is_accepted(),
        "Slot evaluated"
    );

    Ok(verdict)
}

async fn slots_for_day(
    state: &AppState,
    professional_id: Uuid,
    date: Date,
    duration_minutes: u32,
) -> AppResult<Vec<SlotAvailability>> {
    let scheduling = &state.env.scheduling;
    let hours = state.store.working_hours_for(weekday_index(date)).await?;
    let existing = state.store.appointments_for(professional_id, date).await?;

    let slots = available_slots(
        &scheduling.validator(),
        professional_id,
        date,
        duration_minutes,
        hours.as_ref(),
        &existing,
        &scheduling.grid,
        scheduling.now(),
    )?;
    Ok(slots)
}

async fn resolve_duration(
    state: &AppState,
    i18n: &I18n,
    service_id: Option<Uuid>,
    duration_minutes: Option<u32>,
) -> AppResult<u32> {
    match (service_id, duration_minutes) {
        (Some(id), _) => state
            .store
            .find_service(id)
            .await?
            .filter(|service| service.active)
            .map(|service| service.duration())
            .ok_or_else(|| AppError::NotFound(i18n.get("error-service-not-found"))),
        (None, Some(minutes)) => Ok(minutes),
        (None, None) => Err(AppError::BadRequest(
            "Either serviceId or durationMinutes is required".to_string(),
        )),
    }
}

fn reject(i18n: &I18n, rejection: Rejection) -> AppError {
    tracing::info!(reason = rejection.code(), "Booking rejected");
    AppError::Rejected {
        message: i18n.rejection(&rejection),
        rejection,
    }
}
