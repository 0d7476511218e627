use axum::{extract::State, http::StatusCode, middleware, routing::get, Json, Router};
use serde_json::json;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    app_state::AppState,
    middleware::{language_middleware, observability_middleware},
    modules::{
        appointments::appointment_routes, i18n::create_i18n_routes, services::service_routes,
        working_hours::working_hours_routes,
    },
    websocket::websocket_routes,
};

pub fn create_router(state: AppState) -> Router {
    let ws_app = websocket_routes().with_state(state.events.clone());

    let api = Router::new()
        .merge(appointment_routes())
        .merge(service_routes())
        .merge(working_hours_routes())
        .nest("/i18n", create_i18n_routes());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .merge(ws_app)
        .layer(middleware::from_fn(language_middleware))
        .layer(middleware::from_fn(observability_middleware))
        .layer(cors)
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let store_status = match state.store.ping().await {
        Ok(()) => "healthy",
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            "unhealthy"
        }
    };

    let telemetry_health = crate::telemetry::telemetry_health_check();
    let status = if store_status == "healthy" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = json!({
        "status": if status == StatusCode::OK { "ok" } else { "degraded" },
        "timestamp": OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "store": store_status,
            "telemetry": telemetry_health
        }
    });

    (status, Json(body))
}
