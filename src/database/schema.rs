//! Esquema de la base de datos
//!
//! El esquema se crea al arrancar con sentencias idempotentes; no hay
//! directorio de migraciones. Los tipos ENUM se crean dentro de un bloque
//! DO que ignora `duplicate_object` para tolerar reinicios.

use sqlx::PgPool;

/// Crear tipos y tablas si no existen
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        DO $$ BEGIN
            CREATE TYPE user_role AS ENUM ('staff', 'receptionist', 'admin');
        EXCEPTION
            WHEN duplicate_object THEN NULL;
        END $$;
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        DO $$ BEGIN
            CREATE TYPE inspection_form_type AS ENUM ('pre', 'post');
        EXCEPTION
            WHEN duplicate_object THEN NULL;
        END $$;
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            full_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role user_role NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vehicles (
            id UUID PRIMARY KEY,
            plate_number TEXT NOT NULL UNIQUE,
            brand TEXT NOT NULL,
            model TEXT NOT NULL,
            year INTEGER NOT NULL,
            vehicle_type TEXT NOT NULL,
            fuel_type TEXT NOT NULL,
            seat_capacity INTEGER NOT NULL,
            maintenance_status BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY,
            vehicle JSONB NOT NULL,
            booking_date DATE NOT NULL,
            return_date DATE NOT NULL,
            project TEXT NOT NULL,
            destination TEXT NOT NULL,
            passengers INTEGER NOT NULL,
            booking_status BOOLEAN NOT NULL DEFAULT FALSE,
            key_collection_status BOOLEAN NOT NULL DEFAULT FALSE,
            key_return_status BOOLEAN NOT NULL DEFAULT FALSE,
            rejection_reason TEXT,
            booked_by UUID NOT NULL REFERENCES users(id),
            approved_by UUID REFERENCES users(id),
            managed_by UUID REFERENCES users(id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inspections (
            id UUID PRIMARY KEY,
            booking_id UUID NOT NULL REFERENCES bookings(id) ON DELETE CASCADE,
            form_type inspection_form_type NOT NULL,
            checks JSONB NOT NULL,
            odometer INTEGER NOT NULL,
            next_service_date DATE,
            images JSONB NOT NULL,
            submitted_by UUID NOT NULL REFERENCES users(id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Un solo formulario por tipo y reserva; respaldo del chequeo en
    // transacción del repositorio
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS inspections_booking_form_idx
        ON inspections (booking_id, form_type)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
