//! Services module
//!
//! Este módulo contiene la lógica que habla con el servicio de pedidos:
//! listados de referencia con cache, ajustes y archivos.

pub mod file_service;
pub mod reference_service;
pub mod settings_service;

pub use file_service::{read_files, TempFileService, UploadedFile};
pub use reference_service::ReferenceService;
pub use settings_service::SettingsService;
