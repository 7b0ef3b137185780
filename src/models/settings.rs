//! Configuración de notificaciones de Telegram y archivos temporales

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::validation::deserialize_string_or_number;

/// Configuración del bot de notificaciones
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelegramSettings {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub bot_token: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub chat_id: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TelegramSettings {
    pub fn has_credentials(&self) -> bool {
        !self.bot_token.trim().is_empty() && !self.chat_id.trim().is_empty()
    }
}

/// Archivo temporal ya subido al almacenamiento
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempFile {
    pub name: String,
    pub url: String,
    pub size: u64,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: String,
    #[serde(rename = "type")]
    pub content_type: String,
}

/// Tamaño legible: `512 B`, `1.5 KB`, `2.0 MB`
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
