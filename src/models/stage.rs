//! Modelo de etapas de transporte
//!
//! Una etapa agrupa origen, destino, fecha de carga, vehículo con su conductor
//! derivado, y sus listas de puntos intermedios y aduanas.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tipo de punto intermedio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WaypointType {
    #[default]
    Loading,
    Unloading,
}

impl WaypointType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaypointType::Loading => "loading",
            WaypointType::Unloading => "unloading",
        }
    }
}

impl fmt::Display for WaypointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaypointType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "loading" => Ok(WaypointType::Loading),
            "unloading" => Ok(WaypointType::Unloading),
            other => Err(format!("unknown waypoint type '{}'", other)),
        }
    }
}

/// Punto intermedio de carga/descarga dentro de una etapa
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    /// Clave de orden: no se compacta al borrar
    pub waypoint_order: u32,
    pub location: String,
    pub waypoint_type: WaypointType,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointField {
    Location,
    WaypointType,
    Notes,
}

/// Paso de aduana de una etapa
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customs {
    pub id: String,
    pub customs_name: String,
}

/// Etapa del pedido
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub stage_number: u32,
    pub from_location: String,
    pub to_location: String,
    /// `DD-MM-YYYY` mientras se edita
    pub planned_departure: String,
    pub vehicle_id: Option<i64>,
    pub driver_id: Option<i64>,
    pub driver_phone: String,
    pub driver_additional_phone: String,
    pub customs: Vec<Customs>,
    pub waypoints: Vec<Waypoint>,
    pub notes: String,
    #[serde(default)]
    pub started: bool,
}

impl Stage {
    pub fn new(id: String, stage_number: u32, from_location: String) -> Self {
        Self {
            id,
            stage_number,
            from_location,
            to_location: String::new(),
            planned_departure: String::new(),
            vehicle_id: None,
            driver_id: None,
            driver_phone: String::new(),
            driver_additional_phone: String::new(),
            customs: Vec::new(),
            waypoints: Vec::new(),
            notes: String::new(),
            started: false,
        }
    }

    /// Siguiente clave de orden: máximo existente + 1, o 1 si no hay puntos
    pub fn next_waypoint_order(&self) -> u32 {
        self.waypoints
            .iter()
            .map(|w| w.waypoint_order)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Puntos intermedios ordenados por su clave
    pub fn sorted_waypoints(&self) -> Vec<&Waypoint> {
        let mut waypoints: Vec<&Waypoint> = self.waypoints.iter().collect();
        waypoints.sort_by_key(|w| w.waypoint_order);
        waypoints
    }

    pub fn waypoint_mut(&mut self, waypoint_id: &str) -> Option<&mut Waypoint> {
        self.waypoints.iter_mut().find(|w| w.id == waypoint_id)
    }

    pub fn customs_mut(&mut self, customs_id: &str) -> Option<&mut Customs> {
        self.customs.iter_mut().find(|c| c.id == customs_id)
    }

    pub fn clear_driver(&mut self) {
        self.driver_id = None;
        self.driver_phone.clear();
        self.driver_additional_phone.clear();
    }
}

/// Campos de la etapa que el operador puede cambiar.
/// El conductor no está: se deriva del vehículo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageField {
    FromLocation,
    ToLocation,
    PlannedDeparture,
    VehicleId,
    Notes,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waypoint(id: &str, order: u32, location: &str) -> Waypoint {
        Waypoint {
            id: id.to_string(),
            waypoint_order: order,
            location: location.to_string(),
            waypoint_type: WaypointType::Loading,
            notes: String::new(),
        }
    }

    #[test]
    fn test_next_waypoint_order() {
        let mut stage = Stage::new("1".to_string(), 1, String::new());
        assert_eq!(stage.next_waypoint_order(), 1);

        stage.waypoints.push(waypoint("a", 1, "X"));
        stage.waypoints.push(waypoint("b", 5, "Y"));
        assert_eq!(stage.next_waypoint_order(), 6);
    }

    #[test]
    fn test_sorted_waypoints() {
        let mut stage = Stage::new("1".to_string(), 1, String::new());
        stage.waypoints.push(waypoint("a", 3, "C"));
        stage.waypoints.push(waypoint("b", 1, "A"));
        stage.waypoints.push(waypoint("c", 2, "B"));

        let locations: Vec<&str> = stage.sorted_waypoints().iter().map(|w| w.location.as_str()).collect();
        assert_eq!(locations, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_waypoint_type_serde() {
        assert_eq!(serde_json::to_string(&WaypointType::Unloading).unwrap(), "\"unloading\"");
        assert_eq!("loading".parse::<WaypointType>().unwrap(), WaypointType::Loading);
        assert!("transit".parse::<WaypointType>().is_err());
    }
}
