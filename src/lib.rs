//! Gateway de la consola de pedidos de transporte
//!
//! Compone pedidos de varias etapas en borradores del lado del servidor,
//! los valida y los envía al servicio de pedidos. También reenvía la gestión
//! de datos de referencia, permisos, Telegram y archivos temporales.

pub mod cache;
pub mod clients;
pub mod composer;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::Router;

use crate::state::AppState;

/// Construye la aplicación a partir del estado compartido
pub fn build_app(state: AppState) -> Router {
    routes::create_app_router(state)
}
