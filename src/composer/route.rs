//! Ruta legible derivada de las etapas

use crate::models::Stage;

pub const ROUTE_SEPARATOR: &str = " → ";

/// Origen de la primera etapa y, por cada etapa, sus puntos intermedios
/// ordenados seguidos de su destino. Las partes vacías se omiten.
pub fn derive_route(stages: &[Stage]) -> String {
    let mut parts: Vec<&str> = Vec::new();

    if let Some(first) = stages.first() {
        parts.push(&first.from_location);
    }

    for stage in stages {
        parts.extend(stage.sorted_waypoints().into_iter().map(|w| w.location.as_str()));
        parts.push(&stage.to_location);
    }

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(ROUTE_SEPARATOR)
}
