use crate::dto::api_response::ApiResponse;
use crate::dto::settings_dto::{RolePermissionsResponse, SavePermissionsRequest, TogglePermissionRequest};
use crate::models::TelegramSettings;
use crate::services::SettingsService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::messages;

pub struct SettingsController {
    service: SettingsService,
}

impl SettingsController {
    pub fn new(state: &AppState) -> Self {
        Self {
            service: SettingsService::from_state(state),
        }
    }

    pub async fn role_permissions(&self, role_name: &str) -> Result<RolePermissionsResponse, AppError> {
        let role = self.service.role(role_name).await?;
        Ok(RolePermissionsResponse::new(role.role_name, role.permissions))
    }

    pub async fn save_permissions(
        &self,
        role_name: &str,
        request: SavePermissionsRequest,
    ) -> Result<ApiResponse<RolePermissionsResponse>, AppError> {
        let response = self
            .service
            .save_permissions(role_name, request.permissions)
            .await?;
        Ok(ApiResponse::success_with_message(response, messages::PERMISSIONS_SAVED))
    }

    pub async fn toggle_permission(
        &self,
        role_name: &str,
        request: TogglePermissionRequest,
    ) -> Result<ApiResponse<RolePermissionsResponse>, AppError> {
        let response = self
            .service
            .toggle_permission(role_name, &request.section, request.action)
            .await?;
        Ok(ApiResponse::success_with_message(response, messages::PERMISSIONS_SAVED))
    }

    pub async fn telegram_settings(&self) -> Result<TelegramSettings, AppError> {
        self.service.telegram_settings().await
    }

    pub async fn save_telegram_settings(
        &self,
        settings: TelegramSettings,
    ) -> Result<ApiResponse<TelegramSettings>, AppError> {
        let saved = self.service.save_telegram_settings(settings).await?;
        Ok(ApiResponse::success_with_message(saved, messages::TELEGRAM_SAVED))
    }

    pub async fn test_telegram_bot(&self, settings: TelegramSettings) -> Result<ApiResponse<()>, AppError> {
        self.service.test_telegram_bot(&settings).await?;
        Ok(ApiResponse::message(messages::TELEGRAM_TEST_SENT))
    }
}
