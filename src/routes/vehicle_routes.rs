use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::{require_role, vehicle_controller::VehicleController};
use crate::dto::vehicle_dto::{
    AvailabilityQuery, AvailabilityResponse, BookedDatesQuery, BookedDatesResponse,
    CreateVehicleRequest, NextAvailableQuery, NextAvailableResponse, SetMaintenanceRequest,
    UpdateVehicleRequest, VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth_middleware::auth_middleware;
use crate::models::user::{AuthUser, UserRole};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle))
        .route("/", get(list_vehicles))
        .route("/:id", get(get_vehicle))
        .route("/:id", put(update_vehicle))
        .route("/:id", delete(delete_vehicle))
        .route("/:id/maintenance", put(set_maintenance))
        .route("/:id/availability", get(availability))
        .route("/:id/next-available", get(next_available))
        .route("/:id/booked-dates", get(booked_dates))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    require_role(&user, UserRole::Admin)?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleResponse>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    require_role(&user, UserRole::Admin)?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn set_maintenance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetMaintenanceRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    require_role(&user, UserRole::Admin)?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller
        .set_maintenance(id, request.maintenance_status)
        .await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_role(&user, UserRole::Admin)?;
    let controller = VehicleController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Vehículo eliminado exitosamente"
    })))
}

async fn availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.availability(id, query.date).await?;
    Ok(Json(response))
}

async fn next_available(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<NextAvailableQuery>,
) -> Result<Json<NextAvailableResponse>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.next_available(id, query.from).await?;
    Ok(Json(response))
}

async fn booked_dates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<BookedDatesQuery>,
) -> Result<Json<BookedDatesResponse>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.booked_dates(id, query.start, query.end).await?;
    Ok(Json(response))
}
