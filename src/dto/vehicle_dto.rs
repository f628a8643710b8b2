use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::vehicle::Vehicle;

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 3, max = 20))]
    pub plate_number: String,

    #[validate(length(min = 2, max = 100))]
    pub brand: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(range(min = 1980, max = 2030))]
    pub year: i32,

    #[validate(length(min = 2, max = 50))]
    pub vehicle_type: String,

    #[validate(length(min = 2, max = 20))]
    pub fuel_type: String,

    #[validate(range(min = 1, max = 60))]
    pub seat_capacity: i32,
}

// Request para actualizar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 3, max = 20))]
    pub plate_number: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1980, max = 2030))]
    pub year: Option<i32>,

    #[validate(length(min = 2, max = 50))]
    pub vehicle_type: Option<String>,

    #[validate(length(min = 2, max = 20))]
    pub fuel_type: Option<String>,

    #[validate(range(min = 1, max = 60))]
    pub seat_capacity: Option<i32>,
}

// Request para fijar el flag de mantenimiento
#[derive(Debug, Deserialize)]
pub struct SetMaintenanceRequest {
    pub maintenance_status: bool,
}

// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: String,
    pub plate_number: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub vehicle_type: String,
    pub fuel_type: String,
    pub seat_capacity: i32,
    pub maintenance_status: bool,
    pub created_at: String,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id.to_string(),
            plate_number: vehicle.plate_number,
            brand: vehicle.brand,
            model: vehicle.model,
            year: vehicle.year,
            vehicle_type: vehicle.vehicle_type,
            fuel_type: vehicle.fuel_type,
            seat_capacity: vehicle.seat_capacity,
            maintenance_status: vehicle.maintenance_status,
            created_at: vehicle.created_at.to_rfc3339(),
        }
    }
}

// Query del check de un solo día; sin fecha se consulta el día actual
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub vehicle_id: String,
    pub date: NaiveDate,
    pub available: bool,
}

// Query de la búsqueda del próximo día libre
#[derive(Debug, Deserialize)]
pub struct NextAvailableQuery {
    pub from: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct NextAvailableResponse {
    pub vehicle_id: String,
    pub next_available_date: Option<NaiveDate>,
}

// Query del calendario de días ocupados
#[derive(Debug, Deserialize)]
pub struct BookedDatesQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct BookedDatesResponse {
    pub vehicle_id: String,
    pub dates: Vec<NaiveDate>,
}
