//! Routers de la API
//!
//! Cada área tiene su `create_*_router()`; aquí se montan bajo `/api`.

pub mod draft_routes;
pub mod file_routes;
pub mod order_routes;
pub mod reference_routes;
pub mod settings_routes;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::cors_layer;
use crate::state::AppState;

/// Router completo del gateway con CORS y trazas
pub fn create_app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health))
        .nest("/api/drafts", draft_routes::create_draft_router(max_upload_bytes))
        .nest("/api/resources", reference_routes::create_reference_router())
        .nest("/api/vehicles", reference_routes::create_vehicle_search_router())
        .nest("/api/orders", order_routes::create_order_router())
        .nest("/api/roles", settings_routes::create_role_router())
        .nest("/api/settings", settings_routes::create_settings_router())
        .nest("/api/temp-files", file_routes::create_temp_file_router(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "environment": state.config.environment,
        "open_drafts": state.open_drafts().await,
        "reference_cache": {
            "entries": state.reference_cache.size().await,
            "stats": state.reference_cache.stats().await,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
