//! Cache en memoria de los listados de referencia
//!
//! Guarda las respuestas de `?resource=...` durante un TTL para no pedir
//! vehículos y conductores en cada cambio del borrador. Las mutaciones
//! invalidan el recurso afectado.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

/// Listado en cache con su instante de carga
#[derive(Debug, Clone)]
struct CachedListing {
    body: Value,
    loaded_at: Instant,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries_expired: u64,
    pub invalidations: u64,
}

pub struct ReferenceCache {
    entries: RwLock<HashMap<String, CachedListing>>,
    ttl: Duration,
    stats: RwLock<CacheStats>,
}

/// Clave del listado: `resource` o `resource?k=v&...`
pub fn cache_key(resource: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return resource.to_string();
    }
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", resource, query)
}

impl ReferenceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            stats: RwLock::new(CacheStats::default()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.write().await;
        let mut stats = self.stats.write().await;

        match entries.get(key) {
            Some(cached) if cached.loaded_at.elapsed() <= self.ttl => {
                stats.hits += 1;
                debug!("Cache hit para '{}'", key);
                Some(cached.body.clone())
            }
            Some(_) => {
                entries.remove(key);
                stats.entries_expired += 1;
                stats.misses += 1;
                debug!("Cache miss (expirado) para '{}'", key);
                None
            }
            None => {
                stats.misses += 1;
                None
            }
        }
    }

    pub async fn set(&self, key: &str, body: Value) {
        if self.ttl.is_zero() {
            return;
        }
        let mut entries = self.entries.write().await;
        let expired = Self::drop_expired(&mut entries, self.ttl);
        if expired > 0 {
            self.stats.write().await.entries_expired += expired as u64;
        }
        entries.insert(
            key.to_string(),
            CachedListing {
                body,
                loaded_at: Instant::now(),
            },
        );
    }

    /// Barrido periódico: quita las entradas caducadas que nadie volvió a pedir
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let expired = Self::drop_expired(&mut entries, self.ttl);
        if expired > 0 {
            self.stats.write().await.entries_expired += expired as u64;
            debug!("Cache: {} entradas caducadas eliminadas", expired);
        }
        expired
    }

    fn drop_expired(entries: &mut HashMap<String, CachedListing>, ttl: Duration) -> usize {
        let before = entries.len();
        entries.retain(|_, cached| cached.loaded_at.elapsed() <= ttl);
        before - entries.len()
    }

    /// Elimina el listado del recurso y todas sus variantes con parámetros
    pub async fn invalidate(&self, resource: &str) {
        let prefix = format!("{}?", resource);
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| key != resource && !key.starts_with(&prefix));

        let removed = before - entries.len();
        if removed > 0 {
            self.stats.write().await.invalidations += removed as u64;
            debug!("Cache invalidado para '{}': {} entradas", resource, removed);
        }
    }

    pub async fn stats(&self) -> CacheStats {
        *self.stats.read().await
    }

    pub async fn size(&self) -> usize {
        self.entries.read().await.len()
    }
}
