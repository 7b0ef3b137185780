//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    /// URL del servicio de pedidos (`?resource=...` y acciones POST)
    pub order_api_url: String,
    /// URL del servicio de archivos temporales
    pub upload_api_url: String,
    /// Sin timeout por defecto: las peticiones esperan la respuesta del servicio
    pub order_api_timeout: Option<Duration>,
    pub reference_cache_ttl: Duration,
    /// Borradores sin uso durante este tiempo se descartan
    pub draft_idle_ttl: Duration,
    pub housekeeping_interval: Duration,
    /// Tamaño máximo del cuerpo multipart (adjuntos y archivos temporales)
    pub max_upload_bytes: usize,
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construir la configuración a partir de una función de búsqueda de variables
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let order_api_url = get("ORDER_API_URL")
            .ok_or_else(|| AppError::Config("ORDER_API_URL must be set".to_string()))?;
        let upload_api_url = get("UPLOAD_API_URL").unwrap_or_else(|| order_api_url.clone());

        let housekeeping_secs: u64 = parse_or("HOUSEKEEPING_INTERVAL_SECS", get("HOUSEKEEPING_INTERVAL_SECS"), 60)?;
        if housekeeping_secs == 0 {
            return Err(AppError::Config(
                "HOUSEKEEPING_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: parse_or("PORT", get("PORT"), 3000)?,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            cors_origins: get("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            order_api_url: order_api_url.trim_end_matches('/').to_string(),
            upload_api_url: upload_api_url.trim_end_matches('/').to_string(),
            order_api_timeout: match get("ORDER_API_TIMEOUT_SECS") {
                Some(raw) => Some(Duration::from_secs(parse_or("ORDER_API_TIMEOUT_SECS", Some(raw), 0)?)),
                None => None,
            },
            reference_cache_ttl: Duration::from_secs(parse_or(
                "REFERENCE_CACHE_TTL",
                get("REFERENCE_CACHE_TTL"),
                60,
            )?),
            draft_idle_ttl: Duration::from_secs(parse_or(
                "DRAFT_IDLE_TTL_SECS",
                get("DRAFT_IDLE_TTL_SECS"),
                4 * 60 * 60,
            )?),
            housekeeping_interval: Duration::from_secs(housekeeping_secs),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", get("MAX_UPLOAD_BYTES"), 50 * 1024 * 1024)?,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> AppResult<T> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a valid number", key))),
        None => Ok(default),
    }
}
