//! Número de pedido sugerido por el servicio

use chrono::NaiveDate;
use serde_json::Value;

use crate::clients::OrderGateway;
use crate::models::{order_number_date, Direction, Resource};

/// Secuencia usada cuando el servicio no sugiere ninguna
pub const FALLBACK_SEQUENCE: &str = "001";

fn sequence_from(body: &Value) -> Option<String> {
    match body.get("next_number")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Pide al servicio la siguiente secuencia para la dirección y la fecha.
/// Cualquier fallo cae en `001`.
pub async fn next_sequence(gateway: &dyn OrderGateway, direction: Direction, date: NaiveDate) -> String {
    let params = [
        ("direction", direction.to_string()),
        ("date", order_number_date(date)),
    ];

    match gateway
        .fetch_resource(Resource::LastOrderNumber.as_str(), &params)
        .await
    {
        Ok(body) => sequence_from(&body).unwrap_or_else(|| FALLBACK_SEQUENCE.to_string()),
        Err(e) => {
            tracing::warn!("⚠️ No se pudo obtener el número de pedido ({}), usando {}", e, FALLBACK_SEQUENCE);
            FALLBACK_SEQUENCE.to_string()
        }
    }
}
