use chrono::{NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::booking::Booking;
use crate::models::vehicle::VehicleSnapshot;
use crate::utils::errors::AppError;

pub struct BookingRepository {
    pool: PgPool,
}

/// Campos mutables de una reserva pendiente, ya resueltos por el controller
#[derive(Debug)]
pub struct BookingFields {
    pub booking_date: NaiveDate,
    pub return_date: NaiveDate,
    pub project: String,
    pub destination: String,
    pub passengers: i32,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        vehicle: VehicleSnapshot,
        fields: BookingFields,
        booked_by: Uuid,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, vehicle, booking_date, return_date, project,
                                  destination, passengers, booking_status,
                                  key_collection_status, key_return_status,
                                  rejection_reason, booked_by, approved_by,
                                  managed_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, false, false, false, NULL, $8, NULL, NULL, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(Json(vehicle))
        .bind(fields.booking_date)
        .bind(fields.return_date)
        .bind(fields.project)
        .bind(fields.destination)
        .bind(fields.passengers)
        .bind(booked_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    /// Colección completa: es el snapshot que consume el motor de
    /// disponibilidad justo antes de validar (fetch-then-validate-then-write)
    pub async fn find_all(&self) -> Result<Vec<Booking>, AppError> {
        let bookings =
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(bookings)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE booked_by = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn update_details(
        &self,
        id: Uuid,
        fields: BookingFields,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET booking_date = $2, return_date = $3, project = $4,
                destination = $5, passengers = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fields.booking_date)
        .bind(fields.return_date)
        .bind(fields.project)
        .bind(fields.destination)
        .bind(fields.passengers)
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }

    pub async fn approve(&self, id: Uuid, approved_by: Uuid) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET booking_status = true, approved_by = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(approved_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }

    pub async fn reject(
        &self,
        id: Uuid,
        approved_by: Uuid,
        reason: String,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET rejection_reason = $3, approved_by = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(approved_by)
        .bind(reason)
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }

    pub async fn set_key_collected(
        &self,
        id: Uuid,
        managed_by: Uuid,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET key_collection_status = true, managed_by = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(managed_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }

    pub async fn set_key_returned(&self, id: Uuid) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET key_return_status = true WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Borrado físico: solo existe para la cancelación iniciada por staff
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
