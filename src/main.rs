use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use fleet_booking::config::environment::EnvironmentConfig;
use fleet_booking::database;
use fleet_booking::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use fleet_booking::routes::create_app_router;
use fleet_booking::services::report::ReportRenderer;
use fleet_booking::services::storage::StorageService;
use fleet_booking::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚐 Fleet Booking - Gestión de reservas e inspecciones");
    info!("=====================================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    database::init_schema(&pool).await?;
    info!("✅ Esquema de base de datos verificado");

    let storage = StorageService::new(&config.upload_dir);
    let report = ReportRenderer::new().map_err(|e| anyhow::anyhow!("Error de plantilla: {}", e))?;

    let app_state = AppState::new(pool, config.clone(), storage, report);

    let cors = if config.is_production() && !config.cors_origins.is_empty() {
        cors_middleware_with_origins(config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    let app = create_app_router(app_state).layer(cors);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔐 Endpoints - Auth:");
    info!("   POST /api/auth/register - Registrar usuario");
    info!("   POST /api/auth/login - Login");
    info!("   GET  /api/auth/me - Usuario actual");
    info!("🚗 Endpoints - Vehicle:");
    info!("   POST /api/vehicle - Crear vehículo (admin)");
    info!("   GET  /api/vehicle - Listar vehículos");
    info!("   GET  /api/vehicle/:id - Obtener vehículo");
    info!("   PUT  /api/vehicle/:id - Actualizar vehículo (admin)");
    info!("   DELETE /api/vehicle/:id - Eliminar vehículo (admin)");
    info!("   PUT  /api/vehicle/:id/maintenance - Flag de mantenimiento (admin)");
    info!("   GET  /api/vehicle/:id/availability - Disponibilidad de un día");
    info!("   GET  /api/vehicle/:id/next-available - Próximo día libre");
    info!("   GET  /api/vehicle/:id/booked-dates - Días ocupados en un rango");
    info!("📅 Endpoints - Booking:");
    info!("   POST /api/booking - Crear reserva (staff)");
    info!("   GET  /api/booking - Listar reservas (staff ve las suyas)");
    info!("   GET  /api/booking/:id - Obtener reserva");
    info!("   PUT  /api/booking/:id - Editar reserva (staff, antes de decisión)");
    info!("   DELETE /api/booking/:id - Cancelar reserva (staff)");
    info!("   PUT  /api/booking/:id/approve - Aprobar (admin)");
    info!("   PUT  /api/booking/:id/reject - Rechazar con razón (admin)");
    info!("   PUT  /api/booking/:id/collect-key - Entregar llave (receptionist)");
    info!("   PUT  /api/booking/:id/return-key - Devolver llave (receptionist)");
    info!("📋 Endpoints - Inspection:");
    info!("   POST /api/inspection - Registrar inspección (staff)");
    info!("   POST /api/inspection/upload - Subir foto (staff)");
    info!("   GET  /api/inspection/:id - Obtener inspección");
    info!("   GET  /api/inspection/:id/report - Reporte PDF/HTML");
    info!("   GET  /api/inspection/booking/:booking_id - Inspecciones de una reserva");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
