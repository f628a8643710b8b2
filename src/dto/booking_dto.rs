use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::booking::Booking;
use crate::models::inspection::Inspection;
use crate::models::vehicle::VehicleSnapshot;
use crate::services::lifecycle;
use crate::services::lifecycle::BookingState;

// Request para crear una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub vehicle_id: Uuid,
    pub booking_date: NaiveDate,
    pub return_date: NaiveDate,

    #[validate(length(min = 2, max = 200))]
    pub project: String,

    #[validate(length(min = 2, max = 200))]
    pub destination: String,

    #[validate(range(min = 1))]
    pub passengers: i32,
}

// Request para editar una reserva (solo mientras sigue pendiente)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBookingRequest {
    pub booking_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,

    #[validate(length(min = 2, max = 200))]
    pub project: Option<String>,

    #[validate(length(min = 2, max = 200))]
    pub destination: Option<String>,

    #[validate(range(min = 1))]
    pub passengers: Option<i32>,
}

// Request de rechazo; la razón es obligatoria y no puede estar vacía
#[derive(Debug, Deserialize)]
pub struct RejectBookingRequest {
    pub reason: String,
}

/// Acciones legales sobre la reserva en su estado actual, ya evaluadas
/// para que el cliente no tenga que replicar las reglas de gating
#[derive(Debug, Serialize)]
pub struct BookingPermissions {
    pub can_edit: bool,
    pub can_cancel: bool,
    pub can_collect_key: bool,
    pub can_return_key: bool,
    pub can_submit_pre_inspection: bool,
    pub can_submit_post_inspection: bool,
}

// Response de reserva
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub vehicle: VehicleSnapshot,
    pub booking_date: NaiveDate,
    pub return_date: NaiveDate,
    pub project: String,
    pub destination: String,
    pub passengers: i32,
    pub state: BookingState,
    pub booking_status: bool,
    pub key_collection_status: bool,
    pub key_return_status: bool,
    pub rejection_reason: Option<String>,
    pub booked_by: String,
    pub approved_by: Option<String>,
    pub managed_by: Option<String>,
    pub permissions: BookingPermissions,
    pub created_at: String,
}

impl BookingResponse {
    /// El estado y los permisos se derivan aquí, una sola vez, con las
    /// inspecciones relacionadas ya cargadas
    pub fn from_booking(booking: &Booking, inspections: &[Inspection]) -> Self {
        Self {
            id: booking.id.to_string(),
            vehicle: booking.vehicle.0.clone(),
            booking_date: booking.booking_date,
            return_date: booking.return_date,
            project: booking.project.clone(),
            destination: booking.destination.clone(),
            passengers: booking.passengers,
            state: lifecycle::derive_state(booking),
            booking_status: booking.booking_status,
            key_collection_status: booking.key_collection_status,
            key_return_status: booking.key_return_status,
            rejection_reason: booking.rejection_reason.clone(),
            booked_by: booking.booked_by.to_string(),
            approved_by: booking.approved_by.map(|id| id.to_string()),
            managed_by: booking.managed_by.map(|id| id.to_string()),
            permissions: BookingPermissions {
                can_edit: lifecycle::can_edit(booking),
                can_cancel: lifecycle::can_cancel(booking),
                can_collect_key: lifecycle::can_collect_key(booking, inspections),
                can_return_key: lifecycle::can_return_key(booking),
                can_submit_pre_inspection: lifecycle::can_submit_pre_inspection(
                    booking,
                    inspections,
                ),
                can_submit_post_inspection: lifecycle::can_submit_post_inspection(
                    booking,
                    inspections,
                ),
            },
            created_at: booking.created_at.to_rfc3339(),
        }
    }
}
