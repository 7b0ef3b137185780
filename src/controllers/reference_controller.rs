use std::collections::HashMap;

use serde_json::Value;

use crate::dto::api_response::ApiResponse;
use crate::dto::reference_dto::VehicleOption;
use crate::models::Resource;
use crate::services::ReferenceService;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::messages;

/// Parámetros que el servicio entiende en los listados; el resto se ignora
const LISTING_PARAMS: [&str; 3] = ["order_id", "direction", "date"];

pub struct ReferenceController {
    service: ReferenceService,
}

impl ReferenceController {
    pub fn new(state: &AppState) -> Self {
        Self {
            service: ReferenceService::from_state(state),
        }
    }

    fn resource(name: &str) -> Result<Resource, AppError> {
        name.parse()
            .map_err(|_| not_found_error(messages::UNKNOWN_RESOURCE))
    }

    /// Listado tal cual lo devuelve el servicio, con los parámetros conocidos
    pub async fn list(&self, name: &str, query: HashMap<String, String>) -> Result<Value, AppError> {
        let resource = Self::resource(name)?;

        // Orden fijo para que la clave de cache no dependa del orden de la query
        let params: Vec<(&str, String)> = LISTING_PARAMS
            .iter()
            .filter_map(|key| query.get(*key).map(|v| (*key, v.clone())))
            .collect();
        if params.len() < query.len() {
            tracing::debug!("Parámetros ignorados en el listado de '{}'", name);
        }

        self.service.listing(resource, &params).await
    }

    pub async fn create(&self, name: &str, data: Value) -> Result<ApiResponse<Value>, AppError> {
        let body = self.service.create(Self::resource(name)?, data).await?;
        Ok(ApiResponse::success_with_message(body, messages::CREATED))
    }

    pub async fn update(&self, name: &str, id: i64, data: Value) -> Result<ApiResponse<Value>, AppError> {
        let body = self.service.update(Self::resource(name)?, id, data).await?;
        Ok(ApiResponse::success_with_message(body, messages::SAVED))
    }

    pub async fn delete(&self, name: &str, id: i64) -> Result<ApiResponse<()>, AppError> {
        self.service.delete(Self::resource(name)?, id).await?;
        Ok(ApiResponse::message(messages::DELETED))
    }

    pub async fn search_vehicles(&self, query: &str) -> Result<Vec<VehicleOption>, AppError> {
        self.service.vehicle_options(query).await
    }
}
