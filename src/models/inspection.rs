//! Modelo de Inspection
//!
//! Formularios de condición del vehículo: uno pre-trip (antes de recoger la
//! llave) y uno post-trip (después de recogerla). Se crean exactamente una
//! vez por (reserva, tipo); no existe edición ni reenvío.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Tipo de formulario - mapea al ENUM inspection_form_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "inspection_form_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InspectionFormType {
    Pre,
    Post,
}

impl InspectionFormType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionFormType::Pre => "pre",
            InspectionFormType::Post => "post",
        }
    }
}

/// Estado tri-valuado de cada pieza revisada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckCondition {
    Unchecked,
    Functional,
    Broken,
}

/// Revisión individual de una pieza del vehículo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartCheck {
    pub condition: CheckCondition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Piezas nombradas que cubre el formulario
pub const PART_CHECKS: &[&str] = &[
    "engine",
    "transmission",
    "brakes",
    "steering",
    "tires",
    "spare_tire",
    "headlights",
    "taillights",
    "signal_lights",
    "wipers",
    "horn",
    "seatbelts",
    "air_conditioning",
    "dashboard_instruments",
    "body_condition",
];

/// Ángulos de las fotos del vehículo
pub const IMAGE_SLOTS: &[&str] = &[
    "front",
    "back",
    "left_side",
    "right_side",
    "interior_front",
    "interior_back",
    "odometer",
];

/// Inspection principal - mapea exactamente a la tabla inspections
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Inspection {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub form_type: InspectionFormType,
    /// JSONB: nombre de pieza -> revisión
    pub checks: Json<BTreeMap<String, PartCheck>>,
    pub odometer: i32,
    pub next_service_date: Option<NaiveDate>,
    /// JSONB: nombre de ángulo -> URL de la imagen subida
    pub images: Json<BTreeMap<String, String>>,
    pub submitted_by: Uuid,
    pub created_at: DateTime<Utc>,
}
