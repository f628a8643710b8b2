//! Generación del reporte PDF de inspección
//!
//! El registro de inspección se aplana a un objeto de datos plano
//! (mapeo campo a campo, sin lógica de transformación) y se renderiza con
//! una plantilla Tera. Si `wkhtmltopdf` está en el PATH, el HTML se
//! convierte a PDF; si no, se devuelve el HTML para imprimir desde el
//! navegador.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use serde_json::json;
use std::process::Stdio;
use tera::{Context, Tera};
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::models::booking::Booking;
use crate::models::inspection::{CheckCondition, Inspection, PART_CHECKS};
use crate::utils::errors::AppError;

/// Errores de generación del reporte
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("template error: {0}")]
    Template(String),
    #[error("conversion error: {0}")]
    Conversion(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ReportError> for AppError {
    fn from(e: ReportError) -> Self {
        AppError::Internal(e.to_string())
    }
}

/// Aplanar inspección + reserva al objeto que consume la plantilla.
///
/// Cada pieza nombrada del formulario aparece siempre, aunque el registro
/// no la traiga (queda como "unchecked" sin observación).
pub fn flatten_inspection(inspection: &Inspection, booking: &Booking) -> serde_json::Value {
    let checks: Vec<serde_json::Value> = PART_CHECKS
        .iter()
        .map(|name| {
            let check = inspection.checks.0.get(*name);
            let condition = check
                .map(|c| c.condition)
                .unwrap_or(CheckCondition::Unchecked);
            let condition = match condition {
                CheckCondition::Unchecked => "unchecked",
                CheckCondition::Functional => "functional",
                CheckCondition::Broken => "broken",
            };
            json!({
                "name": name,
                "condition": condition,
                "remark": check.and_then(|c| c.remark.clone()).unwrap_or_default(),
            })
        })
        .collect();

    let images: Vec<serde_json::Value> = inspection
        .images
        .0
        .iter()
        .map(|(slot, url)| json!({ "slot": slot, "url": url }))
        .collect();

    json!({
        "form_type": inspection.form_type.as_str(),
        "plate_number": booking.vehicle.0.plate_number,
        "brand": booking.vehicle.0.brand,
        "model": booking.vehicle.0.model,
        "project": booking.project,
        "destination": booking.destination,
        "booking_date": booking.booking_date.format("%Y-%m-%d").to_string(),
        "return_date": booking.return_date.format("%Y-%m-%d").to_string(),
        "odometer": inspection.odometer,
        "next_service_date": inspection
            .next_service_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        "submitted_at": inspection.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        "checks": checks,
        "images": images,
    })
}

/// Renderizador del reporte con la plantilla embebida
#[derive(Clone)]
pub struct ReportRenderer {
    tera: Tera,
    wkhtmltopdf_path: Option<String>,
}

/// Resultado del render: PDF real o HTML de respaldo
pub enum ReportOutput {
    Pdf(Vec<u8>),
    Html(String),
}

impl ReportRenderer {
    pub fn new() -> Result<Self, ReportError> {
        let mut tera = Tera::default();
        tera.add_raw_template(
            "inspection_report.html.tera",
            include_str!("../../templates/inspection_report.html.tera"),
        )
        .map_err(|e| ReportError::Template(e.to_string()))?;

        let wkhtmltopdf_path = which::which("wkhtmltopdf")
            .ok()
            .map(|p| p.to_string_lossy().to_string());

        if wkhtmltopdf_path.is_none() {
            warn!("wkhtmltopdf no está en el PATH - el reporte se servirá como HTML");
        }

        Ok(Self {
            tera,
            wkhtmltopdf_path,
        })
    }

    pub async fn render(&self, document: &serde_json::Value) -> Result<ReportOutput, ReportError> {
        let mut context = Context::new();
        context.insert("report", document);

        let html = self
            .tera
            .render("inspection_report.html.tera", &context)
            .map_err(|e| ReportError::Template(e.to_string()))?;

        if let Some(ref wkhtmltopdf) = self.wkhtmltopdf_path {
            match self.convert_html_to_pdf(&html, wkhtmltopdf).await {
                Ok(pdf_bytes) => Ok(ReportOutput::Pdf(pdf_bytes)),
                Err(e) => {
                    warn!(error = %e, "conversión a PDF falló, devolviendo HTML");
                    Ok(ReportOutput::Html(html))
                }
            }
        } else {
            Ok(ReportOutput::Html(html))
        }
    }

    async fn convert_html_to_pdf(
        &self,
        html: &str,
        wkhtmltopdf_path: &str,
    ) -> Result<Vec<u8>, ReportError> {
        let temp_dir = std::env::temp_dir();
        let html_path = temp_dir.join(format!("inspection_{}.html", uuid::Uuid::new_v4()));
        let pdf_path = temp_dir.join(format!("inspection_{}.pdf", uuid::Uuid::new_v4()));

        tokio::fs::write(&html_path, html).await?;

        let output = Command::new(wkhtmltopdf_path)
            .arg("--page-size")
            .arg("A4")
            .arg("--encoding")
            .arg("utf-8")
            .arg("--enable-local-file-access")
            .arg(&html_path)
            .arg(&pdf_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(stderr = %stderr, "wkhtmltopdf falló");
            return Err(ReportError::Conversion(stderr.to_string()));
        }

        let pdf_bytes = tokio::fs::read(&pdf_path).await?;

        let _ = tokio::fs::remove_file(&html_path).await;
        let _ = tokio::fs::remove_file(&pdf_path).await;

        info!(size = pdf_bytes.len(), "reporte PDF generado");

        Ok(pdf_bytes)
    }
}

impl ReportOutput {
    pub fn into_response(self, filename: &str) -> Response {
        match self {
            ReportOutput::Pdf(bytes) => Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "application/pdf")
                .header(
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                )
                .body(Body::from(bytes))
                .unwrap(),
            ReportOutput::Html(html) => Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
                .body(Body::from(html))
                .unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inspection::{InspectionFormType, PartCheck};
    use crate::models::vehicle::VehicleSnapshot;
    use chrono::{NaiveDate, Utc};
    use sqlx::types::Json;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn sample() -> (Inspection, Booking) {
        let booking = Booking {
            id: Uuid::new_v4(),
            vehicle: Json(VehicleSnapshot {
                id: Uuid::new_v4(),
                plate_number: "WXA 1234".to_string(),
                brand: "Toyota".to_string(),
                model: "Hiace".to_string(),
                seat_capacity: 5,
            }),
            booking_date: NaiveDate::from_ymd_opt(2024, 10, 15).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2024, 10, 16).unwrap(),
            project: "Site survey".to_string(),
            destination: "North plant".to_string(),
            passengers: 3,
            booking_status: true,
            key_collection_status: false,
            key_return_status: false,
            rejection_reason: None,
            booked_by: Uuid::new_v4(),
            approved_by: Some(Uuid::new_v4()),
            managed_by: None,
            created_at: Utc::now(),
        };

        let mut checks = BTreeMap::new();
        checks.insert(
            "brakes".to_string(),
            PartCheck {
                condition: CheckCondition::Broken,
                remark: Some("squeals at low speed".to_string()),
            },
        );
        let mut images = BTreeMap::new();
        images.insert("front".to_string(), "/uploads/abc.jpg".to_string());

        let inspection = Inspection {
            id: Uuid::new_v4(),
            booking_id: booking.id,
            form_type: InspectionFormType::Pre,
            checks: Json(checks),
            odometer: 45_210,
            next_service_date: None,
            images: Json(images),
            submitted_by: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        (inspection, booking)
    }

    #[test]
    fn flatten_carries_every_named_part_check() {
        let (inspection, booking) = sample();
        let doc = flatten_inspection(&inspection, &booking);

        let checks = doc["checks"].as_array().unwrap();
        assert_eq!(checks.len(), PART_CHECKS.len());

        let brakes = checks
            .iter()
            .find(|c| c["name"] == "brakes")
            .unwrap();
        assert_eq!(brakes["condition"], "broken");
        assert_eq!(brakes["remark"], "squeals at low speed");

        // Piezas no revisadas quedan como unchecked
        let engine = checks.iter().find(|c| c["name"] == "engine").unwrap();
        assert_eq!(engine["condition"], "unchecked");
    }

    #[test]
    fn flatten_maps_header_fields_verbatim() {
        let (inspection, booking) = sample();
        let doc = flatten_inspection(&inspection, &booking);

        assert_eq!(doc["form_type"], "pre");
        assert_eq!(doc["plate_number"], "WXA 1234");
        assert_eq!(doc["booking_date"], "2024-10-15");
        assert_eq!(doc["odometer"], 45_210);
        assert_eq!(doc["next_service_date"], "");
        assert_eq!(doc["images"][0]["slot"], "front");
        assert_eq!(doc["images"][0]["url"], "/uploads/abc.jpg");
    }

    #[tokio::test]
    async fn renderer_falls_back_to_html_without_wkhtmltopdf() {
        let mut renderer = ReportRenderer::new().unwrap();
        renderer.wkhtmltopdf_path = None;

        let (inspection, booking) = sample();
        let doc = flatten_inspection(&inspection, &booking);

        match renderer.render(&doc).await.unwrap() {
            ReportOutput::Html(html) => {
                assert!(html.contains("WXA 1234"));
                assert!(html.contains("Site survey"));
            }
            ReportOutput::Pdf(_) => panic!("expected HTML without wkhtmltopdf"),
        }
    }
}
