use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::models::{vehicle_form_display_name, Resource, Vehicle};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::messages;
use crate::utils::validation::{
    deserialize_optional_id, normalize_license_plate, normalize_phone, validate_not_empty,
};

// Formulario de conductor
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct DriverForm {
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub last_name: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub phone: String,
    #[serde(default)]
    pub additional_phone: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub passport_series: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub passport_number: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub passport_issued_by: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub passport_issue_date: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub license_series: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub license_number: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub license_issued_by: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub license_issue_date: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Formulario de vehículo; `display_name` se calcula
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct VehicleForm {
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub vehicle_type: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub vehicle_brand: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub license_plate: String,
    #[serde(default)]
    pub trailer_plate: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub body_type: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub company_name: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    #[validate(required(message = "Обязательное поле"))]
    pub driver_id: Option<i64>,
    #[serde(default)]
    pub display_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Formulario de transportista
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ClientForm {
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub name: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub phone: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Formulario de cliente (заказчик)
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CustomerForm {
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub company_name: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub inn: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub legal_address: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub director_name: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub nickname: String,
    #[serde(default)]
    pub phone: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Formulario de dirección de entrega
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct DeliveryAddressForm {
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub address_name: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub address: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Formulario de usuario
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UserForm {
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub username: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub role: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn parse_form<T>(data: Value) -> AppResult<T>
where
    T: for<'de> Deserialize<'de> + Validate,
{
    let form: T = serde_json::from_value(data)
        .map_err(|e| AppError::BadRequest(format!("{}: {}", messages::SAVE_FAILED, e)))?;
    form.validate()?;
    Ok(form)
}

fn to_payload<T: Serialize>(form: &T) -> AppResult<Value> {
    serde_json::to_value(form).map_err(|e| AppError::Internal(e.to_string()))
}

/// Valida el formulario del recurso y lo normaliza antes de enviarlo:
/// teléfonos con `+`, matrículas en mayúsculas y el nombre visible del vehículo.
pub fn prepare_reference_payload(resource: Resource, data: Value) -> AppResult<Value> {
    match resource {
        Resource::Drivers => {
            let mut form: DriverForm = parse_form(data)?;
            form.phone = normalize_phone(&form.phone);
            form.additional_phone = normalize_phone(&form.additional_phone);
            to_payload(&form)
        }
        Resource::Vehicles => {
            let mut form: VehicleForm = parse_form(data)?;
            form.license_plate = normalize_license_plate(&form.license_plate);
            form.trailer_plate = normalize_license_plate(&form.trailer_plate);
            form.display_name =
                vehicle_form_display_name(&form.vehicle_brand, &form.license_plate, &form.trailer_plate);
            to_payload(&form)
        }
        Resource::Clients => {
            let mut form: ClientForm = parse_form(data)?;
            form.phone = normalize_phone(&form.phone);
            to_payload(&form)
        }
        Resource::Customers => {
            let mut form: CustomerForm = parse_form(data)?;
            form.phone = normalize_phone(&form.phone);
            to_payload(&form)
        }
        Resource::DeliveryAddresses => to_payload(&parse_form::<DeliveryAddressForm>(data)?),
        Resource::Users => {
            let mut form: UserForm = parse_form(data)?;
            form.phone = normalize_phone(&form.phone);
            form.email = form.email.filter(|e| !e.trim().is_empty());
            to_payload(&form)
        }
        _ => Err(AppError::Forbidden(messages::RESOURCE_READ_ONLY.to_string())),
    }
}

// Opción del selector de vehículos
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleOption {
    pub id: i64,
    pub display_text: String,
    pub driver_id: Option<i64>,
}

impl From<&Vehicle> for VehicleOption {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id,
            display_text: vehicle.display_text(),
            driver_id: vehicle.driver_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VehicleSearchQuery {
    #[serde(default)]
    pub q: String,
}
