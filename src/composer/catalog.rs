//! Catálogo de referencia que usa el compositor
//!
//! Vehículos y conductores tal como los lista el servicio. Elegir un vehículo
//! en una etapa resuelve aquí el conductor asignado y sus teléfonos.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{Driver, Vehicle};
use crate::utils::errors::{AppError, AppResult};

/// Extrae la lista `{"<key>": [...]}` de una respuesta de listado.
/// Una clave ausente o nula equivale a lista vacía.
pub fn parse_listing<T: DeserializeOwned>(body: &Value, key: &str) -> AppResult<Vec<T>> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(list) => serde_json::from_value(list.clone()).map_err(|e| {
            AppError::Internal(format!("Respuesta inesperada para '{}': {}", key, e))
        }),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    pub vehicles: Vec<Vehicle>,
    pub drivers: Vec<Driver>,
}

impl ReferenceCatalog {
    pub fn new(vehicles: Vec<Vehicle>, drivers: Vec<Driver>) -> Self {
        Self { vehicles, drivers }
    }

    /// Construye el catálogo a partir de las respuestas de `?resource=vehicles`
    /// y `?resource=drivers`
    pub fn from_listings(vehicles: &Value, drivers: &Value) -> AppResult<Self> {
        Ok(Self {
            vehicles: parse_listing(vehicles, "vehicles")?,
            drivers: parse_listing(drivers, "drivers")?,
        })
    }

    pub fn vehicle(&self, id: i64) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn driver(&self, id: i64) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.id == id)
    }

    /// Conductor asignado al vehículo, si el vehículo tiene uno y existe
    pub fn assigned_driver(&self, vehicle_id: i64) -> Option<&Driver> {
        self.vehicle(vehicle_id)
            .and_then(|v| v.driver_id)
            .and_then(|driver_id| self.driver(driver_id))
    }

    pub fn search_vehicles(&self, query: &str) -> Vec<&Vehicle> {
        self.vehicles.iter().filter(|v| v.matches(query)).collect()
    }
}
