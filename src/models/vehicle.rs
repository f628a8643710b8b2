//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y el snapshot embebido que las
//! reservas guardan en el momento de crearse. Mapea exactamente al schema
//! PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate_number: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub vehicle_type: String,
    pub fuel_type: String,
    pub seat_capacity: i32,
    /// Override manual: un vehículo en mantenimiento no está disponible
    /// para ninguna fecha, sin importar las reservas existentes.
    pub maintenance_status: bool,
    pub created_at: DateTime<Utc>,
}

/// Snapshot del vehículo embebido en cada reserva.
///
/// No es una foreign key viva: cambios posteriores de matrícula o capacidad
/// no alteran reservas históricas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleSnapshot {
    pub id: Uuid,
    pub plate_number: String,
    pub brand: String,
    pub model: String,
    pub seat_capacity: i32,
}

impl From<&Vehicle> for VehicleSnapshot {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id,
            plate_number: vehicle.plate_number.clone(),
            brand: vehicle.brand.clone(),
            model: vehicle.model.clone(),
            seat_capacity: vehicle.seat_capacity,
        }
    }
}
