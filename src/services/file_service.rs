//! Archivos recibidos por multipart
//!
//! Los archivos se leen de uno en uno. Cada archivo temporal se sube por
//! separado: un fallo no detiene a los demás.

use std::sync::Arc;

use axum::extract::Multipart;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use serde_json::Value;

use crate::clients::{OrderGateway, TempFileUpload};
use crate::dto::settings_dto::TempFileResult;
use crate::models::{format_file_size, TempFile};
use crate::utils::errors::AppResult;
use crate::utils::messages;

/// Archivo recibido en la petición
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Lee todos los campos con nombre de archivo, en orden
pub async fn read_files(mut multipart: Multipart) -> AppResult<Vec<UploadedFile>> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        log::debug!("📎 Archivo '{}' recibido ({})", name, format_file_size(bytes.len() as u64));
        files.push(UploadedFile {
            name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Ok(files)
}

pub struct TempFileService {
    gateway: Arc<dyn OrderGateway>,
}

impl TempFileService {
    pub fn new(gateway: Arc<dyn OrderGateway>) -> Self {
        Self { gateway }
    }

    pub async fn upload_all(&self, files: Vec<UploadedFile>) -> Vec<TempFileResult> {
        let mut results = Vec::with_capacity(files.len());
        for file in files {
            results.push(self.upload(file).await);
        }
        results
    }

    async fn upload(&self, file: UploadedFile) -> TempFileResult {
        let size = file.bytes.len() as u64;
        let upload = TempFileUpload {
            filename: file.name.clone(),
            content: STANDARD.encode(&file.bytes),
            content_type: file
                .content_type
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "application/octet-stream".to_string()),
        };

        let outcome = match self.gateway.upload_temp_file(&upload).await {
            Ok(reply) => reply.into_success(messages::FILE_UPLOAD_FAILED),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(body) => {
                log::info!("✅ Archivo '{}' subido", file.name);
                TempFileResult {
                    file: Some(TempFile {
                        name: file.name.clone(),
                        url: body.get("url").and_then(Value::as_str).unwrap_or_default().to_string(),
                        size,
                        uploaded_at: Utc::now().to_rfc3339(),
                        content_type: file
                            .content_type
                            .filter(|t| !t.is_empty())
                            .unwrap_or_else(|| "unknown".to_string()),
                    }),
                    size_text: Some(format_file_size(size)),
                    name: file.name,
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                log::warn!("❌ No se pudo subir '{}': {}", file.name, e);
                TempFileResult {
                    name: file.name,
                    success: false,
                    file: None,
                    size_text: None,
                    error: Some(e.user_message()),
                }
            }
        }
    }
}
