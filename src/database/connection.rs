//! Conexión a PostgreSQL
//!
//! Este módulo crea el pool de conexiones a partir de la configuración.

use anyhow::Result;
use sqlx::PgPool;

use crate::config::database::DatabaseConfig;

/// Crear un pool de conexiones a la base de datos
pub async fn create_pool(database_url: Option<&str>) -> Result<PgPool> {
    let config = match database_url {
        Some(url) => DatabaseConfig {
            url: url.to_string(),
            ..DatabaseConfig::default()
        },
        None => DatabaseConfig::default(),
    };

    let pool = config.create_pool().await?;
    Ok(pool)
}
