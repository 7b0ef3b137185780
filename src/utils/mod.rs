//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! normalización de campos y los mensajes localizados.

pub mod errors;
pub mod messages;
pub mod validation;

pub use errors::{AppError, AppResult, FieldErrors};
