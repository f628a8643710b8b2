use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, plate_number, brand, model, year, vehicle_type,
                                  fuel_type, seat_capacity, maintenance_status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, false, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.plate_number)
        .bind(request.brand)
        .bind(request.model)
        .bind(request.year)
        .bind(request.vehicle_type)
        .bind(request.fuel_type)
        .bind(request.seat_capacity)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_all(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(vehicles)
    }

    pub async fn plate_exists(&self, plate_number: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE plate_number = $1)")
                .bind(plate_number)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateVehicleFields,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET plate_number = $2, brand = $3, model = $4, year = $5,
                vehicle_type = $6, fuel_type = $7, seat_capacity = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.plate_number)
        .bind(request.brand)
        .bind(request.model)
        .bind(request.year)
        .bind(request.vehicle_type)
        .bind(request.fuel_type)
        .bind(request.seat_capacity)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn set_maintenance(
        &self,
        id: Uuid,
        maintenance_status: bool,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET maintenance_status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(maintenance_status)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Campos ya resueltos de un update (los opcionales del request rellenados
/// con los valores actuales por el controller)
#[derive(Debug)]
pub struct UpdateVehicleFields {
    pub plate_number: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub vehicle_type: String,
    pub fuel_type: String,
    pub seat_capacity: i32,
}

impl UpdateVehicleFields {
    pub fn merge(current: &Vehicle, request: UpdateVehicleRequest) -> Self {
        Self {
            plate_number: request
                .plate_number
                .unwrap_or_else(|| current.plate_number.clone()),
            brand: request.brand.unwrap_or_else(|| current.brand.clone()),
            model: request.model.unwrap_or_else(|| current.model.clone()),
            year: request.year.unwrap_or(current.year),
            vehicle_type: request
                .vehicle_type
                .unwrap_or_else(|| current.vehicle_type.clone()),
            fuel_type: request
                .fuel_type
                .unwrap_or_else(|| current.fuel_type.clone()),
            seat_capacity: request.seat_capacity.unwrap_or(current.seat_capacity),
        }
    }
}
