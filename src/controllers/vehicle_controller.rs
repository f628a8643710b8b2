use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{
    AvailabilityResponse, BookedDatesResponse, CreateVehicleRequest, NextAvailableResponse,
    UpdateVehicleRequest, VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::models::vehicle::Vehicle;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::vehicle_repository::{UpdateVehicleFields, VehicleRepository};
use crate::services::availability;
use crate::utils::dates;
use crate::utils::errors::AppError;

pub struct VehicleController {
    repository: VehicleRepository,
    bookings: BookingRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        if self.repository.plate_exists(&request.plate_number).await? {
            return Err(AppError::Conflict(
                "La matrícula ya está registrada".to_string(),
            ));
        }

        let vehicle = self.repository.create(request).await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehículo creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self.find_vehicle(id).await?;
        Ok(VehicleResponse::from(vehicle))
    }

    pub async fn list(&self) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.repository.find_all().await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let current = self.find_vehicle(id).await?;

        if let Some(ref plate) = request.plate_number {
            if plate != &current.plate_number && self.repository.plate_exists(plate).await? {
                return Err(AppError::Conflict(
                    "La matrícula ya está registrada".to_string(),
                ));
            }
        }

        let fields = UpdateVehicleFields::merge(&current, request);
        let vehicle = self.repository.update(id, fields).await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehículo actualizado exitosamente".to_string(),
        ))
    }

    pub async fn set_maintenance(
        &self,
        id: Uuid,
        maintenance_status: bool,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        self.find_vehicle(id).await?;
        let vehicle = self
            .repository
            .set_maintenance(id, maintenance_status)
            .await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Estado de mantenimiento actualizado".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.find_vehicle(id).await?;
        self.repository.delete(id).await?;
        Ok(())
    }

    /// Check de un solo día (vista de estado); sin fecha usa el día actual
    pub async fn availability(
        &self,
        id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<AvailabilityResponse, AppError> {
        let vehicle = self.find_vehicle(id).await?;
        let date = date.unwrap_or_else(dates::today);
        let bookings = self.bookings.find_all().await?;

        Ok(AvailabilityResponse {
            vehicle_id: vehicle.id.to_string(),
            date,
            available: availability::is_available(&vehicle, date, &bookings),
        })
    }

    pub async fn next_available(
        &self,
        id: Uuid,
        from: Option<NaiveDate>,
    ) -> Result<NextAvailableResponse, AppError> {
        let vehicle = self.find_vehicle(id).await?;
        let from = from.unwrap_or_else(dates::today);
        let bookings = self.bookings.find_all().await?;

        Ok(NextAvailableResponse {
            vehicle_id: vehicle.id.to_string(),
            next_available_date: availability::next_available_date(
                &vehicle,
                &bookings,
                from,
                availability::MAX_DAYS_TO_CHECK,
            ),
        })
    }

    pub async fn booked_dates(
        &self,
        id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BookedDatesResponse, AppError> {
        if end < start {
            return Err(AppError::BadRequest(
                "La fecha final no puede ser anterior a la inicial".to_string(),
            ));
        }

        let vehicle = self.find_vehicle(id).await?;
        let bookings = self.bookings.find_all().await?;

        Ok(BookedDatesResponse {
            vehicle_id: vehicle.id.to_string(),
            dates: availability::booked_dates(&vehicle, start, end, &bookings),
        })
    }

    async fn find_vehicle(&self, id: Uuid) -> Result<Vehicle, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))
    }
}
