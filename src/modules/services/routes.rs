use axum::{routing::get, Router};

use super::handlers::{create_service, list_services};
use crate::app_state::AppState;

pub fn service_routes() -> Router<AppState> {
    Router::new().route("/services", get(list_services).post(create_service))
}
