//! Datos de referencia
//!
//! Conductores, vehículos y el catálogo de recursos que el servicio de pedidos
//! expone por `?resource=...`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::validation::{deserialize_optional_id, deserialize_string_or_number};

/// Conductor tal como lo lista el servicio
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub last_name: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub first_name: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub middle_name: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub phone: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub additional_phone: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub license_number: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub status: String,
}

impl Driver {
    pub fn full_name(&self) -> String {
        [&self.last_name, &self.first_name, &self.middle_name]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Vehículo con su conductor asignado
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub license_plate: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub model: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub vehicle_brand: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub trailer_plate: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub vehicle_type: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub body_type: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub company_name: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub driver_id: Option<i64>,
}

impl Vehicle {
    /// Texto del selector de vehículos: `"{marca|modelo} {matrícula}[ / {remolque}]"`
    pub fn display_text(&self) -> String {
        let brand = if self.vehicle_brand.trim().is_empty() {
            self.model.trim()
        } else {
            self.vehicle_brand.trim()
        };
        let mut text = format!("{} {}", brand, self.license_plate.trim());
        if !self.trailer_plate.trim().is_empty() {
            text.push_str(" / ");
            text.push_str(self.trailer_plate.trim());
        }
        text.trim().to_string()
    }

    /// Búsqueda sin distinguir mayúsculas sobre el texto del selector
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty() || self.display_text().to_lowercase().contains(&query)
    }
}

/// Nombre que guarda el formulario de vehículos: `"{marca} {matrícula} + {remolque}"`
pub fn vehicle_form_display_name(brand: &str, license_plate: &str, trailer_plate: &str) -> String {
    let trailer = if trailer_plate.trim().is_empty() {
        String::new()
    } else {
        format!("+ {}", trailer_plate.trim())
    };
    [brand.trim(), license_plate.trim(), trailer.as_str()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Recursos del servicio de pedidos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Orders,
    Drivers,
    Vehicles,
    Clients,
    Customers,
    DeliveryAddresses,
    Users,
    Roles,
    Stats,
    ActivityLog,
    OrderStages,
    TelegramSettings,
    LastOrderNumber,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Orders => "orders",
            Resource::Drivers => "drivers",
            Resource::Vehicles => "vehicles",
            Resource::Clients => "clients",
            Resource::Customers => "customers",
            Resource::DeliveryAddresses => "delivery_addresses",
            Resource::Users => "users",
            Resource::Roles => "roles",
            Resource::Stats => "stats",
            Resource::ActivityLog => "activity_log",
            Resource::OrderStages => "order_stages",
            Resource::TelegramSettings => "telegram_settings",
            Resource::LastOrderNumber => "last_order_number",
        }
    }

    /// Nombre en singular para PUT/DELETE y para la acción `create_<entidad>`.
    /// Sólo los datos de referencia editables lo tienen.
    pub fn entity_name(&self) -> Option<&'static str> {
        match self {
            Resource::Drivers => Some("driver"),
            Resource::Vehicles => Some("vehicle"),
            Resource::Clients => Some("client"),
            Resource::Customers => Some("customer"),
            Resource::DeliveryAddresses => Some("delivery_address"),
            Resource::Users => Some("user"),
            _ => None,
        }
    }

    pub fn create_action(&self) -> Option<String> {
        self.entity_name().map(|name| format!("create_{}", name))
    }

    /// Clave del listado en la respuesta (`{"drivers": [...]}`)
    pub fn listing_key(&self) -> &'static str {
        match self {
            Resource::ActivityLog => "logs",
            Resource::OrderStages => "stages",
            Resource::TelegramSettings => "settings",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let resource = match s {
            "orders" => Resource::Orders,
            "drivers" => Resource::Drivers,
            "vehicles" => Resource::Vehicles,
            "clients" => Resource::Clients,
            "customers" => Resource::Customers,
            "delivery_addresses" => Resource::DeliveryAddresses,
            "users" => Resource::Users,
            "roles" => Resource::Roles,
            "stats" => Resource::Stats,
            "activity_log" => Resource::ActivityLog,
            "order_stages" => Resource::OrderStages,
            "telegram_settings" => Resource::TelegramSettings,
            "last_order_number" => Resource::LastOrderNumber,
            other => return Err(format!("unknown resource '{}'", other)),
        };
        Ok(resource)
    }
}
