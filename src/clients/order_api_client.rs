//! Cliente HTTP para el servicio de pedidos
//!
//! El servicio expone listados por query string (`?resource=orders`),
//! acciones por POST (`{ action: ..., data: ... }`) y PUT/DELETE genéricos para
//! los datos de referencia. Los archivos temporales van a un servicio aparte.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::EnvironmentConfig;
use crate::utils::errors::{AppError, AppResult};

/// Respuesta cruda del servicio: estado HTTP + cuerpo JSON (o `Null`)
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceReply {
    pub status: u16,
    pub body: Value,
}

impl ServiceReply {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    /// Éxito = estado 2xx **y** `success: true`
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.body.get("success").and_then(Value::as_bool) == Some(true)
    }

    /// Mensaje del servicio, si lo hay (`error` tiene prioridad sobre `message`)
    pub fn service_message(&self) -> Option<String> {
        ["error", "message"]
            .iter()
            .filter_map(|key| self.body.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|m| !m.is_empty())
            .map(str::to_string)
    }

    /// Convierte la respuesta en error lógico si no fue exitosa
    pub fn into_success(self, fallback: &str) -> AppResult<Value> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(self.into_error(fallback))
        }
    }

    /// Criterio de los datos de referencia: basta un estado 2xx
    pub fn into_accepted(self, fallback: &str) -> AppResult<Value> {
        if (200..300).contains(&self.status) {
            Ok(self.body)
        } else {
            Err(self.into_error(fallback))
        }
    }

    fn into_error(self, fallback: &str) -> AppError {
        AppError::Service(self.service_message().unwrap_or_else(|| fallback.to_string()))
    }
}

/// Archivo temporal a subir (contenido en base64 sin prefijo `data:`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempFileUpload {
    pub filename: String,
    pub content: String,
    pub content_type: String,
}

/// Frontera con el servicio de pedidos
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// `GET ?resource=...&<params>`; un estado no 2xx es error
    async fn fetch_resource(&self, resource: &str, params: &[(&str, String)]) -> AppResult<Value>;

    /// `POST { action, ... }`
    async fn post_action(&self, body: Value) -> AppResult<ServiceReply>;

    /// `PUT { resource, id, data }`
    async fn put_resource(&self, body: Value) -> AppResult<ServiceReply>;

    /// `DELETE { resource, id }`
    async fn delete_resource(&self, body: Value) -> AppResult<ServiceReply>;

    /// `POST { action: 'upload_temp_file', filename, content, content_type }`
    async fn upload_temp_file(&self, upload: &TempFileUpload) -> AppResult<ServiceReply>;
}

/// Cliente HTTP real del servicio de pedidos
pub struct OrderApiClient {
    pub client: Client,
    pub api_url: String,
    pub upload_url: String,
}

impl OrderApiClient {
    /// Crear nuevo cliente con las URLs de la configuración
    pub fn new(config: &EnvironmentConfig) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.order_api_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            api_url: config.order_api_url.clone(),
            upload_url: config.upload_api_url.clone(),
        })
    }

    /// URL de listado con la query codificada
    pub fn resource_url(&self, resource: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}?resource={}", self.api_url, urlencoding::encode(resource));
        for (key, value) in params {
            url.push('&');
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn send_json(&self, method: Method, url: &str, body: &Value) -> AppResult<ServiceReply> {
        log::debug!("📤 {} {}", method, url);

        let response = self
            .client
            .request(method.clone(), url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        // Un cuerpo que no es JSON se trata como vacío: sin `success` es un fallo
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        if !status.is_success() {
            log::warn!("❌ {} {} respondió {}", method, url, status);
        }

        Ok(ServiceReply {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl OrderGateway for OrderApiClient {
    async fn fetch_resource(&self, resource: &str, params: &[(&str, String)]) -> AppResult<Value> {
        let url = self.resource_url(resource, params);
        log::info!("🌐 Consultando recurso '{}'", resource);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            log::error!("❌ Recurso '{}' falló con estado {}: {}", resource, status, text);
            let reply = ServiceReply {
                status: status.as_u16(),
                body: serde_json::from_str(&text).unwrap_or(Value::Null),
            };
            return Err(AppError::Service(
                reply
                    .service_message()
                    .unwrap_or_else(|| format!("HTTP {}", status)),
            ));
        }

        Ok(response.json().await?)
    }

    async fn post_action(&self, body: Value) -> AppResult<ServiceReply> {
        self.send_json(Method::POST, &self.api_url, &body).await
    }

    async fn put_resource(&self, body: Value) -> AppResult<ServiceReply> {
        self.send_json(Method::PUT, &self.api_url, &body).await
    }

    async fn delete_resource(&self, body: Value) -> AppResult<ServiceReply> {
        self.send_json(Method::DELETE, &self.api_url, &body).await
    }

    async fn upload_temp_file(&self, upload: &TempFileUpload) -> AppResult<ServiceReply> {
        let body = serde_json::json!({
            "action": "upload_temp_file",
            "filename": upload.filename,
            "content": upload.content,
            "content_type": upload.content_type,
        });
        self.send_json(Method::POST, &self.upload_url, &body).await
    }
}
