//! Modelo del pedido
//!
//! Cabecera del pedido, líneas de clientes, adjuntos y la forma en que la
//! consola entrega un pedido existente para editarlo.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::validation::{deserialize_optional_id, deserialize_string_or_number};

/// Dirección del transporte: prefijo del número de pedido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Direction {
    #[default]
    EU,
    RF,
    CH,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::EU => "EU",
            Direction::RF => "RF",
            Direction::CH => "CH",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EU" => Ok(Direction::EU),
            "RF" => Ok(Direction::RF),
            "CH" => Ok(Direction::CH),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// Fecha del número de pedido: `DDMMYYYY`
pub fn order_number_date(date: NaiveDate) -> String {
    date.format("%d%m%Y").to_string()
}

/// `{DIRECTION}{DDMMYYYY}-{seq}`, p.ej. `EU17122024-001`
pub fn format_order_number(direction: Direction, date: NaiveDate, sequence: &str) -> String {
    format!("{}{}-{}", direction, order_number_date(date), sequence)
}

/// Cabecera del pedido tal como la edita el operador
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderHeader {
    pub order_number: String,
    /// Siempre ISO `YYYY-MM-DD` cuando es válida
    pub order_date: String,
    pub cargo_type: String,
    pub cargo_weight: String,
    pub invoice: String,
    pub track_number: String,
    pub notes: String,
}

impl OrderHeader {
    pub fn value(&self, field: HeaderField) -> &str {
        match field {
            HeaderField::OrderNumber => &self.order_number,
            HeaderField::OrderDate => &self.order_date,
            HeaderField::CargoType => &self.cargo_type,
            HeaderField::CargoWeight => &self.cargo_weight,
            HeaderField::Invoice => &self.invoice,
            HeaderField::TrackNumber => &self.track_number,
            HeaderField::Notes => &self.notes,
        }
    }
}

/// Campos editables de la cabecera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderField {
    OrderNumber,
    OrderDate,
    CargoType,
    CargoWeight,
    Invoice,
    TrackNumber,
    Notes,
}

impl HeaderField {
    pub const ALL: [HeaderField; 7] = [
        HeaderField::OrderNumber,
        HeaderField::OrderDate,
        HeaderField::CargoType,
        HeaderField::CargoWeight,
        HeaderField::Invoice,
        HeaderField::TrackNumber,
        HeaderField::Notes,
    ];

    /// Campos que quedan de sólo lectura una vez que el pedido existe
    pub fn locked_when_editing(&self) -> bool {
        !matches!(self, HeaderField::Notes)
    }
}

/// Línea de cliente: cliente seleccionado + nota libre ("7 тонн, 5 паллет")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerItem {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerItemField {
    CustomerId,
    Note,
}

/// Archivo adjunto al crear el pedido, codificado como data URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub data: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
}

impl Attachment {
    pub fn from_bytes(name: &str, content_type: Option<&str>, bytes: &[u8]) -> Self {
        let content_type = content_type
            .filter(|t| !t.is_empty())
            .unwrap_or("application/octet-stream")
            .to_string();
        Self {
            name: name.to_string(),
            data: format!("data:{};base64,{}", content_type, STANDARD.encode(bytes)),
            size: bytes.len() as u64,
            content_type,
        }
    }
}

/// Pedido existente tal como lo muestra la consola, para abrirlo en edición
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExistingOrder {
    pub id: i64,
    #[serde(default)]
    pub order_number: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub order_date: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub cargo_type: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub cargo_weight: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub invoice: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub track_number: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub notes: String,
    #[serde(default)]
    pub customer_items: Vec<CustomerItem>,
    #[serde(default)]
    pub stages: Vec<ExistingStage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExistingStage {
    pub id: i64,
    #[serde(default)]
    pub stage_number: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub from_location: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub to_location: String,
    /// ISO, puede venir como timestamp completo
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub planned_departure: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub vehicle_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub driver_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub notes: String,
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub waypoints: Vec<ExistingWaypoint>,
    #[serde(default)]
    pub customs_points: Vec<ExistingCustoms>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExistingWaypoint {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub waypoint_order: u32,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub location: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub waypoint_type: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub notes: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExistingCustoms {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub customs_name: String,
}
