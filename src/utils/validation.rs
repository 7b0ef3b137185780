//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y la normalización que hacen los campos con máscara de la consola:
//! fechas `ДД-ММ-ГГГГ`, teléfonos y matrículas.

use std::borrow::Cow;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

use crate::utils::messages;

/// Formato de fecha que ve el operador
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";
/// Formato de fecha que espera el servicio de pedidos
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

lazy_static! {
    static ref DISPLAY_DATE_RE: Regex = Regex::new(r"^\d{2}-\d{2}-\d{4}$").unwrap();
    static ref ISO_DATE_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref NON_DIGITS_RE: Regex = Regex::new(r"\D").unwrap();
    static ref NON_PHONE_RE: Regex = Regex::new(r"[^\d+]").unwrap();
    static ref NON_PLATE_RE: Regex = Regex::new(r"[^A-Za-zА-Яа-яЁё0-9-]").unwrap();
}

/// Parsear una fecha `DD-MM-YYYY` (exactamente dos dígitos de día y mes)
pub fn parse_display_date(value: &str) -> Option<NaiveDate> {
    if !DISPLAY_DATE_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DISPLAY_DATE_FORMAT).ok()
}

/// `17-12-2024` -> `2024-12-17`
pub fn display_to_iso(value: &str) -> Option<String> {
    parse_display_date(value).map(|d| d.format(ISO_DATE_FORMAT).to_string())
}

/// `2024-12-17` -> `17-12-2024`. Acepta también un timestamp ISO completo.
pub fn iso_to_display(value: &str) -> Option<String> {
    let date_part = value.get(..10)?;
    if !ISO_DATE_RE.is_match(date_part) {
        return None;
    }
    NaiveDate::parse_from_str(date_part, ISO_DATE_FORMAT)
        .ok()
        .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
}

/// Máscara del campo de fecha: sólo dígitos, guiones en las posiciones 2 y 5,
/// máximo 10 caracteres.
pub fn mask_date_input(raw: &str) -> String {
    let digits = NON_DIGITS_RE.replace_all(raw, "");
    let mut masked = String::with_capacity(10);
    for (i, c) in digits.chars().take(8).enumerate() {
        if i == 2 || i == 4 {
            masked.push('-');
        }
        masked.push(c);
    }
    masked
}

/// Máscara + comprobación al salir del campo: una fecha completa pero
/// inexistente en el calendario se vacía.
pub fn normalize_date_input(raw: &str) -> String {
    let masked = mask_date_input(raw);
    if masked.len() == 10 && parse_display_date(&masked).is_none() {
        return String::new();
    }
    masked
}

/// Teléfono: sólo dígitos y un único `+` inicial
pub fn normalize_phone(raw: &str) -> String {
    let cleaned = NON_PHONE_RE.replace_all(raw, "");
    if cleaned.is_empty() {
        return String::new();
    }
    format!("+{}", cleaned.replace('+', ""))
}

/// Matrícula: letras latinas o cirílicas, dígitos y guiones, en mayúsculas
pub fn normalize_license_plate(raw: &str) -> String {
    NON_PLATE_RE.replace_all(raw, "").to_uppercase()
}

/// Validar que un string no esté vacío (ignorando espacios)
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.message = Some(Cow::Borrowed(messages::REQUIRED_FIELD));
        return Err(error);
    }
    Ok(())
}

/// Validar que una fecha opcional del formulario tenga formato `DD-MM-YYYY` o ISO
pub fn validate_form_date(value: &str) -> Result<(), ValidationError> {
    validate_not_empty(value)?;
    if parse_display_date(value).is_none() && iso_to_display(value).is_none() {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.message = Some(Cow::Borrowed(messages::INVALID_DATE));
        return Err(error);
    }
    Ok(())
}

/// El servicio devuelve algunos campos de texto (peso, número siguiente) a veces
/// como número y a veces como string.
pub fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Ids de la consola: llegan como número, como string numérico o vacíos
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Id de la consola en texto (`""` = sin selección)
pub fn parse_optional_id(value: &str) -> Result<Option<i64>, std::num::ParseIntError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_iso_round_trip() {
        assert_eq!(display_to_iso("17-12-2024").as_deref(), Some("2024-12-17"));
        assert_eq!(iso_to_display("2024-12-17").as_deref(), Some("17-12-2024"));
        assert_eq!(iso_to_display("2024-12-17T10:00:00Z").as_deref(), Some("17-12-2024"));
    }

    #[test]
    fn test_display_date_rejects_bad_input() {
        assert!(display_to_iso("31-02-2024").is_none());
        assert!(display_to_iso("1-12-2024").is_none());
        assert!(display_to_iso("2024-12-17").is_none());
        assert!(iso_to_display("17-12-2024").is_none());
        assert!(iso_to_display("").is_none());
    }

    #[test]
    fn test_mask_date_input() {
        assert_eq!(mask_date_input("1"), "1");
        assert_eq!(mask_date_input("17"), "17");
        assert_eq!(mask_date_input("171"), "17-1");
        assert_eq!(mask_date_input("17122024"), "17-12-2024");
        assert_eq!(mask_date_input("17.12.2024 extra 99"), "17-12-2024");
    }

    #[test]
    fn test_normalize_date_input_clears_impossible_dates() {
        assert_eq!(normalize_date_input("29022024"), "29-02-2024");
        assert_eq!(normalize_date_input("29022023"), "");
        assert_eq!(normalize_date_input("3113"), "31-13");
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("375 29-123-45-67"), "+375291234567");
        assert_eq!(normalize_phone("+7 (900) 1+2"), "+790012");
        assert_eq!(normalize_phone("abc"), "");
    }

    #[test]
    fn test_normalize_license_plate() {
        assert_eq!(normalize_license_plate("ab 1234-5"), "AB1234-5");
        assert_eq!(normalize_license_plate("а123вс 77"), "А123ВС77");
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("x").is_ok());
        let err = validate_not_empty("   ").unwrap_err();
        assert_eq!(err.message.as_deref(), Some(messages::REQUIRED_FIELD));
    }

    #[test]
    fn test_validate_form_date() {
        assert!(validate_form_date("17-12-2024").is_ok());
        assert!(validate_form_date("2024-12-17").is_ok());
        assert!(validate_form_date("17/12/2024").is_err());
        assert!(validate_form_date("").is_err());
    }

    #[test]
    fn test_parse_optional_id() {
        assert_eq!(parse_optional_id("").unwrap(), None);
        assert_eq!(parse_optional_id(" 42 ").unwrap(), Some(42));
        assert!(parse_optional_id("abc").is_err());
    }
}
