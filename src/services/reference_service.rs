//! Datos de referencia del servicio de pedidos
//!
//! Listados con cache en memoria y altas, cambios y bajas de conductores,
//! vehículos, transportistas, clientes, direcciones y usuarios.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::cache::{cache_key, ReferenceCache};
use crate::clients::OrderGateway;
use crate::composer::ReferenceCatalog;
use crate::dto::reference_dto::{prepare_reference_payload, VehicleOption};
use crate::models::Resource;
use crate::state::AppState;
use crate::utils::errors::{forbidden_error, AppResult};
use crate::utils::messages;

pub struct ReferenceService {
    gateway: Arc<dyn OrderGateway>,
    cache: Arc<ReferenceCache>,
}

impl ReferenceService {
    pub fn new(gateway: Arc<dyn OrderGateway>, cache: Arc<ReferenceCache>) -> Self {
        Self { gateway, cache }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.gateway.clone(), state.reference_cache.clone())
    }

    /// Los números de pedido, las estadísticas y el historial se piden siempre
    fn is_cacheable(resource: Resource) -> bool {
        !matches!(
            resource,
            Resource::LastOrderNumber | Resource::Stats | Resource::ActivityLog
        )
    }

    /// `GET ?resource=...`, servido desde la cache si el listado sigue vigente
    pub async fn listing(&self, resource: Resource, params: &[(&str, String)]) -> AppResult<Value> {
        let cacheable = Self::is_cacheable(resource);
        let key = cache_key(resource.as_str(), params);

        if cacheable {
            if let Some(body) = self.cache.get(&key).await {
                return Ok(body);
            }
        }

        let body = self.gateway.fetch_resource(resource.as_str(), params).await?;
        if cacheable {
            self.cache.set(&key, body.clone()).await;
        }
        Ok(body)
    }

    /// Vehículos y conductores, pedidos en paralelo
    pub async fn catalog(&self) -> AppResult<ReferenceCatalog> {
        let (vehicles, drivers) = tokio::try_join!(
            self.listing(Resource::Vehicles, &[]),
            self.listing(Resource::Drivers, &[]),
        )?;
        ReferenceCatalog::from_listings(&vehicles, &drivers)
    }

    pub async fn vehicle_options(&self, query: &str) -> AppResult<Vec<VehicleOption>> {
        let catalog = self.catalog().await?;
        Ok(catalog
            .search_vehicles(query)
            .into_iter()
            .map(VehicleOption::from)
            .collect())
    }

    fn entity_name(resource: Resource) -> AppResult<&'static str> {
        resource
            .entity_name()
            .ok_or_else(|| forbidden_error(messages::RESOURCE_READ_ONLY))
    }

    /// `POST { action: 'create_<entidad>', data }`
    pub async fn create(&self, resource: Resource, data: Value) -> AppResult<Value> {
        let entity = Self::entity_name(resource)?;
        let data = prepare_reference_payload(resource, data)?;

        log::info!("📝 Creando {}", entity);
        let reply = self
            .gateway
            .post_action(json!({
                "action": format!("create_{}", entity),
                "data": data,
            }))
            .await?;
        let body = reply.into_accepted(messages::SAVE_FAILED)?;

        self.invalidate(resource).await;
        Ok(body)
    }

    /// `PUT { resource: '<entidad>', id, data }`
    pub async fn update(&self, resource: Resource, id: i64, data: Value) -> AppResult<Value> {
        let entity = Self::entity_name(resource)?;
        let data = prepare_reference_payload(resource, data)?;

        log::info!("✏️ Actualizando {} {}", entity, id);
        let reply = self
            .gateway
            .put_resource(json!({
                "resource": entity,
                "id": id,
                "data": data,
            }))
            .await?;
        let body = reply.into_accepted(messages::SAVE_FAILED)?;

        self.invalidate(resource).await;
        Ok(body)
    }

    /// `DELETE { resource: '<entidad>', id }`. El servicio rechaza las bajas
    /// de entidades en uso y su mensaje llega tal cual al operador.
    pub async fn delete(&self, resource: Resource, id: i64) -> AppResult<()> {
        let entity = Self::entity_name(resource)?;

        log::info!("🗑️ Eliminando {} {}", entity, id);
        let reply = self
            .gateway
            .delete_resource(json!({ "resource": entity, "id": id }))
            .await?;
        reply.into_accepted(messages::DELETE_FAILED)?;

        self.invalidate(resource).await;
        Ok(())
    }

    pub async fn invalidate(&self, resource: Resource) {
        self.cache.invalidate(resource.as_str()).await;
    }
}
