use sqlx::PgPool;
use uuid::Uuid;

use crate::controllers::require_role;
use crate::dto::inspection_dto::{CreateInspectionRequest, InspectionResponse};
use crate::dto::ApiResponse;
use crate::models::inspection::{InspectionFormType, IMAGE_SLOTS, PART_CHECKS};
use crate::models::user::{AuthUser, UserRole};
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::inspection_repository::{InspectionRepository, NewInspection};
use crate::services::lifecycle;
use crate::services::report::{flatten_inspection, ReportOutput, ReportRenderer};
use crate::utils::errors::AppError;

pub struct InspectionController {
    repository: InspectionRepository,
    bookings: BookingRepository,
}

impl InspectionController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: InspectionRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        user: AuthUser,
        request: CreateInspectionRequest,
    ) -> Result<ApiResponse<InspectionResponse>, AppError> {
        require_role(&user, UserRole::Staff)?;

        let booking = self
            .bookings
            .find_by_id(request.booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        if booking.booked_by != user.id {
            return Err(AppError::Forbidden(
                "Solo quien creó la reserva puede inspeccionar el vehículo".to_string(),
            ));
        }

        let inspections = self.repository.find_by_booking(request.booking_id).await?;
        match request.form_type {
            InspectionFormType::Pre => {
                lifecycle::check_submit_pre_inspection(&booking, &inspections)?
            }
            InspectionFormType::Post => {
                lifecycle::check_submit_post_inspection(&booking, &inspections)?
            }
        }

        validate_form_contents(&request)?;

        // El repositorio re-verifica la existencia dentro de la transacción
        // que inserta; el índice único cubre el caso de carrera
        let inspection = self
            .repository
            .create(NewInspection {
                booking_id: request.booking_id,
                form_type: request.form_type,
                checks: request.checks,
                odometer: request.odometer,
                next_service_date: request.next_service_date,
                images: request.images,
                submitted_by: user.id,
            })
            .await?;

        Ok(ApiResponse::success_with_message(
            InspectionResponse::from(inspection),
            "Inspección registrada exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<InspectionResponse, AppError> {
        let inspection = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Inspección no encontrada".to_string()))?;

        Ok(InspectionResponse::from(inspection))
    }

    pub async fn list_by_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Vec<InspectionResponse>, AppError> {
        let inspections = self.repository.find_by_booking(booking_id).await?;
        Ok(inspections
            .into_iter()
            .map(InspectionResponse::from)
            .collect())
    }

    /// Renderizar el reporte de una inspección. El nombre del archivo sale
    /// del tipo de formulario y la matrícula del snapshot.
    pub async fn report(
        &self,
        id: Uuid,
        renderer: &ReportRenderer,
    ) -> Result<(ReportOutput, String), AppError> {
        let inspection = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Inspección no encontrada".to_string()))?;

        let booking = self
            .bookings
            .find_by_id(inspection.booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        let filename = format!(
            "inspection_{}_{}.pdf",
            inspection.form_type.as_str(),
            booking.vehicle.0.plate_number.replace(' ', "_")
        );

        let document = flatten_inspection(&inspection, &booking);
        let output = renderer.render(&document).await?;

        Ok((output, filename))
    }
}

/// El formulario solo acepta piezas y ángulos con nombre conocido
fn validate_form_contents(request: &CreateInspectionRequest) -> Result<(), AppError> {
    if request.odometer < 0 {
        return Err(AppError::BadRequest(
            "El odómetro no puede ser negativo".to_string(),
        ));
    }

    for name in request.checks.keys() {
        if !PART_CHECKS.contains(&name.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Pieza desconocida en el formulario: '{}'",
                name
            )));
        }
    }

    for slot in request.images.keys() {
        if !IMAGE_SLOTS.contains(&slot.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Ángulo de foto desconocido: '{}'",
                slot
            )));
        }
    }

    Ok(())
}
