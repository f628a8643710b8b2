pub mod auth_routes;
pub mod booking_routes;
pub mod inspection_routes;
pub mod vehicle_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Ensamblar el router completo de la aplicación a partir del estado.
/// El binario y los tests de integración montan exactamente este router;
/// las capas dependientes del entorno (CORS) se añaden encima.
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/auth", auth_routes::create_auth_router(state.clone()))
        .nest(
            "/api/vehicle",
            vehicle_routes::create_vehicle_router(state.clone()),
        )
        .nest(
            "/api/booking",
            booking_routes::create_booking_router(state.clone()),
        )
        .nest(
            "/api/inspection",
            inspection_routes::create_inspection_router(state.clone()),
        )
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .with_state(state)
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "fleet_booking",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
