use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{
    create_appointment, get_appointment, get_availability, get_suggestions, list_appointments,
    update_appointment_status, validate_slot,
};
use crate::app_state::AppState;

pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/appointments", post(create_appointment).get(list_appointments))
        .route("/appointments/validate", post(validate_slot))
        .route("/appointments/{id}", get(get_appointment))
        .route("/appointments/{id}/status", patch(update_appointment_status))
        .route("/professionals/{id}/availability", get(get_availability))
        .route("/professionals/{id}/suggestions", get(get_suggestions))
}
