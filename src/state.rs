//! Shared application state
//!
//! Este módulo define el estado compartido del gateway que se pasa
//! a través del router de Axum: configuración, cliente del servicio de
//! pedidos, borradores abiertos y cache de listados.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::cache::ReferenceCache;
use crate::clients::OrderGateway;
use crate::composer::{DialogState, OrderComposer};
use crate::config::environment::EnvironmentConfig;
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::messages;

/// Formulario abierto y el último momento en que el operador lo usó
pub struct StoredDraft {
    pub composer: OrderComposer,
    pub last_touched: Instant,
}

impl StoredDraft {
    fn new(composer: OrderComposer) -> Self {
        Self {
            composer,
            last_touched: Instant::now(),
        }
    }
}

pub type DraftStore = Arc<RwLock<HashMap<Uuid, StoredDraft>>>;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub gateway: Arc<dyn OrderGateway>,
    pub drafts: DraftStore,
    pub reference_cache: Arc<ReferenceCache>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, gateway: Arc<dyn OrderGateway>) -> Self {
        let reference_cache = Arc::new(ReferenceCache::new(config.reference_cache_ttl));
        Self {
            config,
            gateway,
            drafts: Arc::new(RwLock::new(HashMap::new())),
            reference_cache,
        }
    }

    /// Guardar un formulario recién abierto y devolver su id
    pub async fn store_composer(&self, composer: OrderComposer) -> Uuid {
        let id = Uuid::new_v4();
        let mut drafts = self.drafts.write().await;
        drafts.insert(id, StoredDraft::new(composer));
        log::info!("💾 Borrador {} guardado. Borradores abiertos: {}", id, drafts.len());
        id
    }

    /// Ejecutar `f` sobre el formulario con el lock de escritura tomado
    pub async fn with_composer<T, F>(&self, id: Uuid, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut OrderComposer) -> AppResult<T>,
    {
        let mut drafts = self.drafts.write().await;
        let stored = drafts
            .get_mut(&id)
            .ok_or_else(|| not_found_error(messages::DRAFT_NOT_FOUND))?;
        stored.last_touched = Instant::now();
        f(&mut stored.composer)
    }

    /// Cerrar el formulario a pedido del operador. Un envío en curso se
    /// abandona: su respuesta ya no encuentra el borrador y se descarta.
    pub async fn close_composer(&self, id: Uuid) -> AppResult<()> {
        let removed = self
            .drafts
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| not_found_error(messages::DRAFT_NOT_FOUND))?;
        if removed.composer.state() == DialogState::Submitting {
            log::warn!("⚠️ Borrador {} cerrado con un envío en curso", id);
        } else {
            log::info!("🗑️ Borrador {} cerrado", id);
        }
        Ok(())
    }

    /// Quitar el formulario del almacén tras un envío confirmado
    pub async fn remove_composer(&self, id: Uuid) -> Option<OrderComposer> {
        let removed = self.drafts.write().await.remove(&id).map(|d| d.composer);
        if removed.is_some() {
            log::info!("✅ Borrador {} enviado y cerrado", id);
        }
        removed
    }

    pub async fn open_drafts(&self) -> usize {
        self.drafts.read().await.len()
    }

    /// Descarta los borradores sin uso durante más de `idle_ttl`.
    /// Los que esperan respuesta del servicio se conservan.
    pub async fn evict_idle_drafts(&self, idle_ttl: Duration) -> usize {
        let mut drafts = self.drafts.write().await;
        let before = drafts.len();
        drafts.retain(|_, stored| {
            stored.composer.state() == DialogState::Submitting
                || stored.last_touched.elapsed() <= idle_ttl
        });

        let evicted = before - drafts.len();
        if evicted > 0 {
            log::info!("🧹 {} borrador(es) inactivos descartados", evicted);
        }
        evicted
    }
}

/// Limpieza periódica de borradores inactivos y listados caducados
pub fn spawn_housekeeping(state: AppState) -> tokio::task::JoinHandle<()> {
    let every = state.config.housekeeping_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            state.evict_idle_drafts(state.config.draft_idle_ttl).await;
            state.reference_cache.purge_expired().await;
        }
    })
}
