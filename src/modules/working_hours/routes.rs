use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{list_working_hours, update_working_hours};
use crate::app_state::AppState;

pub fn working_hours_routes() -> Router<AppState> {
    Router::new()
        .route("/working-hours", get(list_working_hours))
        .route("/working-hours/{day}", put(update_working_hours))
}
