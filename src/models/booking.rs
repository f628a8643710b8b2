//! Modelo de Booking
//!
//! Una reserva referencia un snapshot del vehículo, un rango de fechas de
//! calendario y tres flags booleanos independientes que solo avanzan hacia
//! adelante: aprobación, recogida de llave y devolución de llave.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::vehicle::VehicleSnapshot;

/// Booking principal - mapea exactamente a la tabla bookings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    /// Snapshot JSONB del vehículo en el momento de crear la reserva
    pub vehicle: Json<VehicleSnapshot>,
    pub booking_date: NaiveDate,
    pub return_date: NaiveDate,
    pub project: String,
    pub destination: String,
    pub passengers: i32,
    /// true = aprobada por un admin
    pub booking_status: bool,
    pub key_collection_status: bool,
    pub key_return_status: bool,
    /// Presente implica rechazada; tiene prioridad sobre booking_status
    pub rejection_reason: Option<String>,
    pub booked_by: Uuid,
    /// Se registra tanto al aprobar como al rechazar: quién decidió
    pub approved_by: Option<Uuid>,
    /// Receptionist que entregó la llave
    pub managed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn vehicle_id(&self) -> Uuid {
        self.vehicle.0.id
    }
}
