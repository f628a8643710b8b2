use axum::{
    extract::{Path, State},
    middleware,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{
    BookingResponse, CreateBookingRequest, RejectBookingRequest, UpdateBookingRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth_middleware::auth_middleware;
use crate::models::user::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/", get(list_bookings))
        .route("/:id", get(get_booking))
        .route("/:id", put(update_booking))
        .route("/:id", delete(cancel_booking))
        .route("/:id/approve", put(approve_booking))
        .route("/:id/reject", put(reject_booking))
        .route("/:id/collect-key", put(collect_key))
        .route("/:id/return-key", put(return_key))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.create(user, request).await?;
    Ok(Json(response))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.list(user).await?;
    Ok(Json(response))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.get_by_id(user, id).await?;
    Ok(Json(response))
}

async fn update_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.update(user, id, request).await?;
    Ok(Json(response))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    controller.cancel(user, id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Reserva cancelada exitosamente"
    })))
}

async fn approve_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.approve(user, id).await?;
    Ok(Json(response))
}

async fn reject_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<RejectBookingRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.reject(user, id, request).await?;
    Ok(Json(response))
}

async fn collect_key(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.collect_key(user, id).await?;
    Ok(Json(response))
}

async fn return_key(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.return_key(user, id).await?;
    Ok(Json(response))
}
