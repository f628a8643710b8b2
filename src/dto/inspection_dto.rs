use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::inspection::{Inspection, InspectionFormType, PartCheck};

// Request para crear una inspección (pre o post)
#[derive(Debug, Deserialize)]
pub struct CreateInspectionRequest {
    pub booking_id: Uuid,
    pub form_type: InspectionFormType,
    /// nombre de pieza -> revisión; las piezas deben ser las del formulario
    pub checks: BTreeMap<String, PartCheck>,
    pub odometer: i32,
    pub next_service_date: Option<NaiveDate>,
    /// ángulo -> URL devuelta por el endpoint de upload
    #[serde(default)]
    pub images: BTreeMap<String, String>,
}

// Response de inspección
#[derive(Debug, Serialize)]
pub struct InspectionResponse {
    pub id: String,
    pub booking_id: String,
    pub form_type: InspectionFormType,
    pub checks: BTreeMap<String, PartCheck>,
    pub odometer: i32,
    pub next_service_date: Option<NaiveDate>,
    pub images: BTreeMap<String, String>,
    pub submitted_by: String,
    pub created_at: String,
}

impl From<Inspection> for InspectionResponse {
    fn from(inspection: Inspection) -> Self {
        Self {
            id: inspection.id.to_string(),
            booking_id: inspection.booking_id.to_string(),
            form_type: inspection.form_type,
            checks: inspection.checks.0,
            odometer: inspection.odometer,
            next_service_date: inspection.next_service_date,
            images: inspection.images.0,
            submitted_by: inspection.submitted_by.to_string(),
            created_at: inspection.created_at.to_rfc3339(),
        }
    }
}

// Response del upload de imagen
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}
