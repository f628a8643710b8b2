use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::controllers::require_role;
use crate::dto::booking_dto::{
    BookingResponse, CreateBookingRequest, RejectBookingRequest, UpdateBookingRequest,
};
use crate::dto::ApiResponse;
use crate::models::booking::Booking;
use crate::models::user::{AuthUser, UserRole};
use crate::models::vehicle::VehicleSnapshot;
use crate::repositories::booking_repository::{BookingFields, BookingRepository};
use crate::repositories::inspection_repository::InspectionRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::availability;
use crate::services::lifecycle;
use crate::services::lifecycle::BookingState;
use crate::utils::dates;
use crate::utils::errors::AppError;
use crate::utils::validation;

pub struct BookingController {
    repository: BookingRepository,
    vehicles: VehicleRepository,
    inspections: InspectionRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BookingRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            inspections: InspectionRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        user: AuthUser,
        request: CreateBookingRequest,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        require_role(&user, UserRole::Staff)?;
        request.validate()?;
        validate_date_range(request.booking_date, request.return_date)?;

        let vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if request.passengers > vehicle.seat_capacity {
            return Err(AppError::BadRequest(format!(
                "El número de pasajeros ({}) excede la capacidad del vehículo ({})",
                request.passengers, vehicle.seat_capacity
            )));
        }

        // Snapshot fresco de la colección justo antes de validar el rango.
        // La ventana check-then-act que queda es conocida y aceptada; las
        // pendientes sin revisar bloquean para acotarla.
        let bookings = self.repository.find_all().await?;
        if !availability::is_available_for_range(
            &vehicle,
            request.booking_date,
            request.return_date,
            &bookings,
        ) {
            return Err(AppError::Conflict(
                "El vehículo no está disponible para el rango de fechas solicitado".to_string(),
            ));
        }

        let booking = self
            .repository
            .create(
                VehicleSnapshot::from(&vehicle),
                BookingFields {
                    booking_date: request.booking_date,
                    return_date: request.return_date,
                    project: request.project,
                    destination: request.destination,
                    passengers: request.passengers,
                },
                user.id,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            BookingResponse::from_booking(&booking, &[]),
            "Reserva creada exitosamente".to_string(),
        ))
    }

    /// Listado por rol: staff solo ve sus propias reservas
    pub async fn list(&self, user: AuthUser) -> Result<Vec<BookingResponse>, AppError> {
        let bookings = match user.role {
            UserRole::Staff => self.repository.find_by_user(user.id).await?,
            _ => self.repository.find_all().await?,
        };
        let inspections = self.inspections.find_all().await?;

        Ok(bookings
            .iter()
            .map(|b| BookingResponse::from_booking(b, &inspections))
            .collect())
    }

    pub async fn get_by_id(&self, user: AuthUser, id: Uuid) -> Result<BookingResponse, AppError> {
        let booking = self.find_booking(id).await?;

        if user.role == UserRole::Staff && booking.booked_by != user.id {
            return Err(AppError::Forbidden(
                "No tienes permiso para ver esta reserva".to_string(),
            ));
        }

        let inspections = self.inspections.find_by_booking(id).await?;
        Ok(BookingResponse::from_booking(&booking, &inspections))
    }

    pub async fn update(
        &self,
        user: AuthUser,
        id: Uuid,
        request: UpdateBookingRequest,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        require_role(&user, UserRole::Staff)?;
        request.validate()?;

        let booking = self.find_booking(id).await?;
        if booking.booked_by != user.id {
            return Err(AppError::Forbidden(
                "Solo quien creó la reserva puede editarla".to_string(),
            ));
        }

        lifecycle::check_edit(&booking)?;

        let booking_date = request.booking_date.unwrap_or(booking.booking_date);
        let return_date = request.return_date.unwrap_or(booking.return_date);
        let passengers = request.passengers.unwrap_or(booking.passengers);

        validate_date_range(booking_date, return_date)?;

        // Capacidad contra el snapshot embebido: cambios posteriores del
        // vehículo no afectan reservas ya hechas
        if passengers > booking.vehicle.0.seat_capacity {
            return Err(AppError::BadRequest(format!(
                "El número de pasajeros ({}) excede la capacidad del vehículo ({})",
                passengers, booking.vehicle.0.seat_capacity
            )));
        }

        let vehicle = self
            .vehicles
            .find_by_id(booking.vehicle_id())
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        // La propia reserva no cuenta como conflicto de sí misma
        let others: Vec<Booking> = self
            .repository
            .find_all()
            .await?
            .into_iter()
            .filter(|b| b.id != id)
            .collect();

        if !availability::is_available_for_range(&vehicle, booking_date, return_date, &others) {
            return Err(AppError::Conflict(
                "El vehículo no está disponible para el rango de fechas solicitado".to_string(),
            ));
        }

        let updated = self
            .repository
            .update_details(
                id,
                BookingFields {
                    booking_date,
                    return_date,
                    project: request.project.unwrap_or(booking.project),
                    destination: request.destination.unwrap_or(booking.destination),
                    passengers,
                },
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            BookingResponse::from_booking(&updated, &[]),
            "Reserva actualizada exitosamente".to_string(),
        ))
    }

    pub async fn cancel(&self, user: AuthUser, id: Uuid) -> Result<(), AppError> {
        require_role(&user, UserRole::Staff)?;

        let booking = self.find_booking(id).await?;
        if booking.booked_by != user.id {
            return Err(AppError::Forbidden(
                "Solo quien creó la reserva puede cancelarla".to_string(),
            ));
        }

        lifecycle::check_cancel(&booking)?;
        self.repository.delete(id).await?;
        Ok(())
    }

    pub async fn approve(
        &self,
        user: AuthUser,
        id: Uuid,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        require_role(&user, UserRole::Admin)?;

        let booking = self.find_booking(id).await?;
        if lifecycle::derive_state(&booking) != BookingState::Pending {
            return Err(AppError::Conflict(
                "La reserva ya fue decidida".to_string(),
            ));
        }

        let approved = self.repository.approve(id, user.id).await?;
        let inspections = self.inspections.find_by_booking(id).await?;

        Ok(ApiResponse::success_with_message(
            BookingResponse::from_booking(&approved, &inspections),
            "Reserva aprobada".to_string(),
        ))
    }

    pub async fn reject(
        &self,
        user: AuthUser,
        id: Uuid,
        request: RejectBookingRequest,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        require_role(&user, UserRole::Admin)?;

        if validation::validate_not_empty(&request.reason).is_err() {
            return Err(AppError::BadRequest(
                "El rechazo requiere una razón no vacía".to_string(),
            ));
        }
        let reason = request.reason.trim();

        let booking = self.find_booking(id).await?;
        if lifecycle::derive_state(&booking) != BookingState::Pending {
            return Err(AppError::Conflict(
                "La reserva ya fue decidida".to_string(),
            ));
        }

        let rejected = self
            .repository
            .reject(id, user.id, reason.to_string())
            .await?;

        Ok(ApiResponse::success_with_message(
            BookingResponse::from_booking(&rejected, &[]),
            "Reserva rechazada".to_string(),
        ))
    }

    pub async fn collect_key(
        &self,
        user: AuthUser,
        id: Uuid,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        require_role(&user, UserRole::Receptionist)?;

        let booking = self.find_booking(id).await?;
        let inspections = self.inspections.find_by_booking(id).await?;

        // El gate corta antes de mutar: sin pre-trip no hay llave
        lifecycle::check_collect_key(&booking, &inspections)?;

        let updated = self.repository.set_key_collected(id, user.id).await?;

        Ok(ApiResponse::success_with_message(
            BookingResponse::from_booking(&updated, &inspections),
            "Llave entregada".to_string(),
        ))
    }

    pub async fn return_key(
        &self,
        user: AuthUser,
        id: Uuid,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        require_role(&user, UserRole::Receptionist)?;

        let booking = self.find_booking(id).await?;
        lifecycle::check_return_key(&booking)?;

        let updated = self.repository.set_key_returned(id).await?;
        let inspections = self.inspections.find_by_booking(id).await?;

        Ok(ApiResponse::success_with_message(
            BookingResponse::from_booking(&updated, &inspections),
            "Llave devuelta".to_string(),
        ))
    }

    async fn find_booking(&self, id: Uuid) -> Result<Booking, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))
    }
}

/// Validaciones compartidas del rango de fechas de una reserva
fn validate_date_range(
    booking_date: chrono::NaiveDate,
    return_date: chrono::NaiveDate,
) -> Result<(), AppError> {
    if return_date < booking_date {
        return Err(AppError::BadRequest(
            "La fecha de retorno no puede ser anterior a la de salida".to_string(),
        ));
    }
    if booking_date < dates::today() {
        return Err(AppError::BadRequest(
            "La fecha de salida no puede estar en el pasado".to_string(),
        ));
    }
    Ok(())
}
