//! Configuración del proyecto
//!
//! Este módulo contiene las variables de entorno y la configuración del gateway.

pub mod environment;

pub use environment::*;
