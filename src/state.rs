//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::report::ReportRenderer;
use crate::services::storage::StorageService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub storage: StorageService,
    pub report: ReportRenderer,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        config: EnvironmentConfig,
        storage: StorageService,
        report: ReportRenderer,
    ) -> Self {
        Self {
            pool,
            config,
            storage,
            report,
        }
    }
}
