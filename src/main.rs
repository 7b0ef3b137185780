use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use freight_backoffice::build_app;
use freight_backoffice::clients::OrderApiClient;
use freight_backoffice::config::EnvironmentConfig;
use freight_backoffice::state::{spawn_housekeeping, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚚 Freight Backoffice - Gateway de pedidos");
    info!("==========================================");

    let config = match EnvironmentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Configuración inválida: {}", e);
            return Err(anyhow::anyhow!("Error de configuración: {}", e));
        }
    };

    let client = OrderApiClient::new(&config)
        .map_err(|e| anyhow::anyhow!("No se pudo crear el cliente HTTP: {}", e))?;
    info!("✅ Servicio de pedidos: {}", config.order_api_url);
    if config.order_api_timeout.is_none() {
        warn!("⚠️ Sin timeout hacia el servicio de pedidos");
    }

    if config.is_development() {
        info!("🛠️ Modo desarrollo: logs detallados con RUST_LOG=debug");
    }
    if config.is_production() && config.cors_origins.is_empty() {
        warn!("⚠️ CORS_ORIGINS vacío en producción: se acepta cualquier origen");
    }

    let addr: SocketAddr = config.server_url().parse()?;
    info!("🌐 Servidor ({}) iniciando en http://{}", config.environment, addr);
    let state = AppState::new(config, Arc::new(client));
    spawn_housekeeping(state.clone());
    info!(
        "🧹 Limpieza cada {:?}: borradores inactivos más de {:?}",
        state.config.housekeeping_interval, state.config.draft_idle_ttl
    );
    let app = build_app(state);

    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del gateway");
    info!("📝 Borradores de pedido:");
    info!("   POST /api/drafts - Nuevo pedido");
    info!("   POST /api/drafts/edit - Editar pedido existente");
    info!("   GET  /api/drafts/:id - Ver borrador");
    info!("   DELETE /api/drafts/:id - Cerrar borrador");
    info!("   PUT  /api/drafts/:id/header - Cabecera");
    info!("   PUT  /api/drafts/:id/direction - Dirección y número");
    info!("   POST /api/drafts/:id/customers - Línea de cliente");
    info!("   POST /api/drafts/:id/stages - Etapas, puntos y aduanas");
    info!("   POST /api/drafts/:id/attachments - Adjuntos");
    info!("   GET  /api/drafts/:id/validation - Validación");
    info!("   POST /api/drafts/:id/submit - Enviar pedido");
    info!("📚 Datos de referencia:");
    info!("   GET|POST /api/resources/:resource");
    info!("   PUT|DELETE /api/resources/:resource/:id");
    info!("   GET  /api/vehicles/search?q= - Selector de vehículos");
    info!("📦 Pedidos:");
    info!("   DELETE /api/orders/:id - Eliminar pedido");
    info!("   GET  /api/orders/:id/stages - Etapas del pedido");
    info!("⚙️ Ajustes:");
    info!("   GET|PUT /api/roles/:role/permissions");
    info!("   POST /api/roles/:role/permissions/toggle");
    info!("   GET|PUT /api/settings/telegram");
    info!("   POST /api/settings/telegram/test");
    info!("📁 Archivos temporales:");
    info!("   POST /api/temp-files");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
