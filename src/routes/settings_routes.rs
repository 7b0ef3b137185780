use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::settings_controller::SettingsController;
use crate::dto::api_response::ApiResponse;
use crate::dto::settings_dto::{RolePermissionsResponse, SavePermissionsRequest, TogglePermissionRequest};
use crate::models::TelegramSettings;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_role_router() -> Router<AppState> {
    Router::new()
        .route("/:role/permissions", get(get_permissions).put(save_permissions))
        .route("/:role/permissions/toggle", post(toggle_permission))
}

pub fn create_settings_router() -> Router<AppState> {
    Router::new()
        .route("/telegram", get(get_telegram_settings).put(save_telegram_settings))
        .route("/telegram/test", post(test_telegram_bot))
}

async fn get_permissions(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> Result<Json<RolePermissionsResponse>, AppError> {
    let controller = SettingsController::new(&state);
    Ok(Json(controller.role_permissions(&role).await?))
}

async fn save_permissions(
    State(state): State<AppState>,
    Path(role): Path<String>,
    Json(request): Json<SavePermissionsRequest>,
) -> Result<Json<ApiResponse<RolePermissionsResponse>>, AppError> {
    let controller = SettingsController::new(&state);
    Ok(Json(controller.save_permissions(&role, request).await?))
}

async fn toggle_permission(
    State(state): State<AppState>,
    Path(role): Path<String>,
    Json(request): Json<TogglePermissionRequest>,
) -> Result<Json<ApiResponse<RolePermissionsResponse>>, AppError> {
    let controller = SettingsController::new(&state);
    Ok(Json(controller.toggle_permission(&role, request).await?))
}

async fn get_telegram_settings(State(state): State<AppState>) -> Result<Json<TelegramSettings>, AppError> {
    let controller = SettingsController::new(&state);
    Ok(Json(controller.telegram_settings().await?))
}

async fn save_telegram_settings(
    State(state): State<AppState>,
    Json(settings): Json<TelegramSettings>,
) -> Result<Json<ApiResponse<TelegramSettings>>, AppError> {
    let controller = SettingsController::new(&state);
    Ok(Json(controller.save_telegram_settings(settings).await?))
}

async fn test_telegram_bot(
    State(state): State<AppState>,
    Json(settings): Json<TelegramSettings>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = SettingsController::new(&state);
    Ok(Json(controller.test_telegram_bot(settings).await?))
}
