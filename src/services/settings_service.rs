//! Roles, permisos y notificaciones de Telegram

use std::sync::Arc;

use serde_json::{json, Value};

use crate::clients::OrderGateway;
use crate::composer::parse_listing;
use crate::dto::settings_dto::RolePermissionsResponse;
use crate::models::{PermissionAction, PermissionSet, Resource, Role, TelegramSettings, SECTIONS};
use crate::services::reference_service::ReferenceService;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppError, AppResult};
use crate::utils::messages;

pub struct SettingsService {
    gateway: Arc<dyn OrderGateway>,
    references: ReferenceService,
}

impl SettingsService {
    pub fn new(gateway: Arc<dyn OrderGateway>, references: ReferenceService) -> Self {
        Self { gateway, references }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.gateway.clone(), ReferenceService::from_state(state))
    }

    pub async fn roles(&self) -> AppResult<Vec<Role>> {
        let body = self.references.listing(Resource::Roles, &[]).await?;
        parse_listing(&body, Resource::Roles.listing_key())
    }

    pub async fn role(&self, role_name: &str) -> AppResult<Role> {
        self.roles()
            .await?
            .into_iter()
            .find(|r| r.role_name == role_name)
            .ok_or_else(|| not_found_error(messages::ROLE_NOT_FOUND))
    }

    /// `POST { action: 'update_role_permissions', role_name, data: { permissions } }`
    pub async fn save_permissions(
        &self,
        role_name: &str,
        permissions: PermissionSet,
    ) -> AppResult<RolePermissionsResponse> {
        log::info!("🔐 Guardando permisos del rol '{}'", role_name);
        let reply = self
            .gateway
            .post_action(json!({
                "action": "update_role_permissions",
                "role_name": role_name,
                "data": { "permissions": permissions },
            }))
            .await?;
        reply.into_accepted(messages::PERMISSIONS_SAVE_FAILED)?;

        self.references.invalidate(Resource::Roles).await;
        Ok(RolePermissionsResponse::new(role_name.to_string(), permissions))
    }

    /// Invierte un permiso del rol y guarda el conjunto completo
    pub async fn toggle_permission(
        &self,
        role_name: &str,
        section: &str,
        action: PermissionAction,
    ) -> AppResult<RolePermissionsResponse> {
        if !SECTIONS.contains(&section) {
            return Err(bad_request_error(messages::UNKNOWN_SECTION));
        }

        let mut role = self.role(role_name).await?;
        let enabled = role.permissions.toggle(section, action);
        log::debug!("🔐 {}.{:?} = {} para '{}'", section, action, enabled, role_name);

        self.save_permissions(role_name, role.permissions).await
    }

    /// La respuesta trae `{ settings: {...} }`; sin configuración se devuelve la vacía
    pub async fn telegram_settings(&self) -> AppResult<TelegramSettings> {
        let body = self.references.listing(Resource::TelegramSettings, &[]).await?;
        match body.get(Resource::TelegramSettings.listing_key()) {
            None | Some(Value::Null) => Ok(TelegramSettings::default()),
            Some(settings) => serde_json::from_value(settings.clone())
                .map_err(|e| AppError::Internal(format!("Configuración de Telegram inválida: {}", e))),
        }
    }

    pub async fn save_telegram_settings(&self, settings: TelegramSettings) -> AppResult<TelegramSettings> {
        log::info!("📨 Guardando configuración de Telegram (activo: {})", settings.is_active);
        let reply = self
            .gateway
            .post_action(json!({ "action": "save_telegram_settings", "data": settings }))
            .await?;
        reply.into_accepted(messages::TELEGRAM_SAVE_FAILED)?;

        self.references.invalidate(Resource::TelegramSettings).await;
        Ok(settings)
    }

    /// Envía un mensaje de prueba. Sin token o sin chat no se llama al servicio.
    pub async fn test_telegram_bot(&self, settings: &TelegramSettings) -> AppResult<()> {
        if !settings.has_credentials() {
            return Err(bad_request_error(messages::TELEGRAM_CREDENTIALS_MISSING));
        }

        let reply = self
            .gateway
            .post_action(json!({
                "action": "test_telegram_bot",
                "data": {
                    "bot_token": settings.bot_token,
                    "chat_id": settings.chat_id,
                },
            }))
            .await?;
        reply.into_success(messages::TELEGRAM_TEST_FAILED)?;
        Ok(())
    }
}
