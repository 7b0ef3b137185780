//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del gateway
//! y su conversión a respuestas HTTP apropiadas.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::utils::messages;

/// Errores de validación por campo: ruta del campo -> mensaje para el operador
pub type FieldErrors = BTreeMap<String, String>;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Draft validation failed: {} field(s)", .0.len())]
    DraftInvalid(FieldErrors),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Error lógico reportado por el servicio de pedidos (mensaje ya listo para mostrar)
    #[error("Order service error: {0}")]
    Service(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl AppError {
    /// Mensaje que se muestra al operador en la notificación
    pub fn user_message(&self) -> String {
        match self {
            AppError::DraftInvalid(_) | AppError::Validation(_) => {
                messages::FILL_REQUIRED_FIELDS.to_string()
            }
            AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg)
            | AppError::Service(msg) => msg.clone(),
            AppError::Transport(_) => messages::SERVICE_UNREACHABLE.to_string(),
            AppError::Multipart(_) => messages::FILE_READ_FAILED.to_string(),
            AppError::Internal(_) | AppError::Config(_) => messages::UNEXPECTED_ERROR.to_string(),
        }
    }
}

/// Convierte los errores de `validator` al mapa campo -> mensaje del gateway
pub fn field_errors_from(errors: &validator::ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, list)| {
            let message = list
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| messages::REQUIRED_FIELD.to_string());
            (field.to_string(), message)
        })
        .collect()
}

impl AppError {
    /// Estado HTTP, etiqueta y código estable de cada variante
    fn classify(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            AppError::DraftInvalid(_) => (StatusCode::UNPROCESSABLE_ENTITY, "Validation Error", "DRAFT_INVALID"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error", "VALIDATION_ERROR"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden", "FORBIDDEN"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found", "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "Conflict", "CONFLICT"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad Request", "BAD_REQUEST"),
            AppError::Internal(_) | AppError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", "INTERNAL_ERROR")
            }
            AppError::Service(_) => (StatusCode::BAD_GATEWAY, "Order Service Error", "ORDER_SERVICE_ERROR"),
            AppError::Transport(_) => (StatusCode::BAD_GATEWAY, "External API Error", "EXTERNAL_API_ERROR"),
            AppError::Multipart(_) => (StatusCode::BAD_REQUEST, "Bad Request", "MULTIPART_ERROR"),
        }
    }

    /// Detalles extra para el cuerpo de la respuesta, solo donde aportan algo
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::DraftInvalid(fields) => Some(json!({ "fields": fields })),
            AppError::Validation(e) => Some(json!({ "fields": field_errors_from(e) })),
            AppError::Internal(msg) | AppError::Config(msg) => Some(json!({ "internal_error": msg })),
            AppError::Transport(e) => Some(json!({ "transport_error": e.to_string() })),
            AppError::Multipart(e) => Some(json!({ "multipart_error": e.to_string() })),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, label, code) = self.classify();

        if status.is_server_error() {
            tracing::error!("❌ {}", self);
        } else if matches!(self, AppError::DraftInvalid(_) | AppError::Validation(_)) {
            tracing::debug!("{}", self);
        } else {
            tracing::warn!("⚠️ {}", self);
        }

        let body = ErrorResponse {
            error: label.to_string(),
            message: self.user_message(),
            details: self.details(),
            code: Some(code.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(message: &str) -> AppError {
    AppError::NotFound(message.to_string())
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

/// Función helper para crear errores de acceso prohibido (campos bloqueados, etapas iniciadas)
pub fn forbidden_error(message: &str) -> AppError {
    AppError::Forbidden(message.to_string())
}
