//! Compositor de pedidos multietapa
//!
//! Estado del formulario de pedido: borrador, ruta derivada, validación,
//! traducción al formato del servicio y ciclo de vida del envío.

pub mod catalog;
pub mod draft;
pub mod lifecycle;
pub mod numbering;
pub mod payload;
pub mod route;
pub mod validate;

pub use catalog::{parse_listing, ReferenceCatalog};
pub use draft::{DraftMode, OrderDraft};
pub use lifecycle::{DialogState, OrderComposer, PendingSubmit, SubmitOutcome, SubmitStep};
pub use numbering::next_sequence;
pub use payload::Actor;
pub use route::derive_route;
pub use validate::validate_draft;

/// Catálogo de prueba: vehículo 1 con conductor 10, vehículo 2 sin conductor,
/// vehículo 3 con un conductor que no existe
#[cfg(test)]
pub(crate) fn test_catalog() -> ReferenceCatalog {
    ReferenceCatalog::from_listings(
        &serde_json::json!({ "vehicles": [
            { "id": 1, "license_plate": "AB1234-5", "vehicle_brand": "Volvo", "driver_id": 10 },
            { "id": 2, "license_plate": "KE777", "vehicle_brand": "MAN", "driver_id": null },
            { "id": 3, "license_plate": "XX000", "vehicle_brand": "DAF", "driver_id": 99 }
        ]}),
        &serde_json::json!({ "drivers": [
            { "id": 10, "last_name": "Петров", "phone": "+375291112233", "additional_phone": "+375447778899" }
        ]}),
    )
    .unwrap()
}

/// Borrador con cabecera y cliente completos, listo para enviar
#[cfg(test)]
pub(crate) fn test_valid_draft(with_stage: bool) -> OrderDraft {
    use crate::models::{CustomerItemField, Direction, HeaderField, StageField};

    let catalog = test_catalog();
    let mut draft = OrderDraft::new(Direction::EU, chrono::NaiveDate::from_ymd_opt(2024, 12, 17).unwrap());
    for (field, value) in [
        (HeaderField::OrderNumber, "EU17122024-001"),
        (HeaderField::Invoice, "INV"),
        (HeaderField::TrackNumber, "TRK"),
        (HeaderField::CargoType, "Паллеты"),
        (HeaderField::CargoWeight, "100"),
    ] {
        draft.set_header_field(field, value).unwrap();
    }
    draft.update_customer_item(0, CustomerItemField::CustomerId, "3").unwrap();
    if with_stage {
        let id = draft.add_stage().id.clone();
        draft.update_stage(&id, StageField::FromLocation, "A", &catalog).unwrap();
        draft.update_stage(&id, StageField::ToLocation, "B", &catalog).unwrap();
        draft.update_stage(&id, StageField::VehicleId, "1", &catalog).unwrap();
        draft.update_stage(&id, StageField::PlannedDeparture, "20-12-2024", &catalog).unwrap();
    }
    draft
}
