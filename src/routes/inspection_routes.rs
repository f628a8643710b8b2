use axum::{
    extract::{Multipart, Path, State},
    middleware,
    response::Response,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::{inspection_controller::InspectionController, require_role};
use crate::dto::inspection_dto::{CreateInspectionRequest, InspectionResponse, UploadResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth_middleware::auth_middleware;
use crate::models::user::{AuthUser, UserRole};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_inspection_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_inspection))
        .route("/upload", post(upload_image))
        .route("/:id", get(get_inspection))
        .route("/:id/report", get(inspection_report))
        .route("/booking/:booking_id", get(list_by_booking))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_inspection(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateInspectionRequest>,
) -> Result<Json<ApiResponse<InspectionResponse>>, AppError> {
    let controller = InspectionController::new(state.pool.clone());
    let response = controller.create(user, request).await?;
    Ok(Json(response))
}

async fn get_inspection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InspectionResponse>, AppError> {
    let controller = InspectionController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_by_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Vec<InspectionResponse>>, AppError> {
    let controller = InspectionController::new(state.pool.clone());
    let response = controller.list_by_booking(booking_id).await?;
    Ok(Json(response))
}

/// Subida de una foto de inspección; devuelve la URL para el slot
async fn upload_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, AppError> {
    require_role(&user, UserRole::Staff)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart inválido: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(|n| n.to_string())
            .ok_or_else(|| AppError::BadRequest("El archivo no tiene nombre".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("No se pudo leer el archivo: {}", e)))?;

        let url = state.storage.save(&original_name, &bytes).await?;
        return Ok(Json(ApiResponse::success(UploadResponse { url })));
    }

    Err(AppError::BadRequest(
        "Falta el campo 'file' en el formulario".to_string(),
    ))
}

async fn inspection_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let controller = InspectionController::new(state.pool.clone());
    let (output, filename) = controller.report(id, &state.report).await?;
    Ok(output.into_response(&filename))
}
