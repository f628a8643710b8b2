use chrono::{NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::inspection::{Inspection, InspectionFormType, PartCheck};
use crate::utils::errors::AppError;

pub struct InspectionRepository {
    pool: PgPool,
}

/// Contenido de una inspección nueva, ya validado por el controller
#[derive(Debug)]
pub struct NewInspection {
    pub booking_id: Uuid,
    pub form_type: InspectionFormType,
    pub checks: BTreeMap<String, PartCheck>,
    pub odometer: i32,
    pub next_service_date: Option<NaiveDate>,
    pub images: BTreeMap<String, String>,
    pub submitted_by: Uuid,
}

impl InspectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear la inspección con guardia de idempotencia: la existencia se
    /// re-verifica dentro de la misma transacción que inserta, y el índice
    /// único sobre (booking_id, form_type) respalda el caso de carrera.
    pub async fn create(&self, new: NewInspection) -> Result<Inspection, AppError> {
        let mut tx = self.pool.begin().await?;

        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM inspections WHERE booking_id = $1 AND form_type = $2)",
        )
        .bind(new.booking_id)
        .bind(new.form_type)
        .fetch_one(&mut *tx)
        .await?;

        if exists.0 {
            return Err(AppError::Conflict(format!(
                "a {}-trip inspection already exists for this booking",
                new.form_type.as_str()
            )));
        }

        let inspection = sqlx::query_as::<_, Inspection>(
            r#"
            INSERT INTO inspections (id, booking_id, form_type, checks, odometer,
                                     next_service_date, images, submitted_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.booking_id)
        .bind(new.form_type)
        .bind(Json(new.checks))
        .bind(new.odometer)
        .bind(new.next_service_date)
        .bind(Json(new.images))
        .bind(new.submitted_by)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(inspection)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Inspection>, AppError> {
        let inspection =
            sqlx::query_as::<_, Inspection>("SELECT * FROM inspections WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(inspection)
    }

    /// Colección completa; la existencia pre/post se decide por escaneo
    /// lineal sobre este snapshot (ver lifecycle::has_inspection)
    pub async fn find_all(&self) -> Result<Vec<Inspection>, AppError> {
        let inspections =
            sqlx::query_as::<_, Inspection>("SELECT * FROM inspections ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;

        Ok(inspections)
    }

    pub async fn find_by_booking(&self, booking_id: Uuid) -> Result<Vec<Inspection>, AppError> {
        let inspections = sqlx::query_as::<_, Inspection>(
            "SELECT * FROM inspections WHERE booking_id = $1 ORDER BY created_at",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(inspections)
    }
}
