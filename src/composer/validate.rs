//! Validación del borrador antes de enviarlo
//!
//! Sólo campos obligatorios y formato de fechas; no hay comprobaciones de
//! rango ni de coherencia entre etapas.

use crate::composer::draft::OrderDraft;
use crate::utils::errors::FieldErrors;
use crate::utils::messages;
use crate::utils::validation::{iso_to_display, parse_display_date};

fn require(errors: &mut FieldErrors, key: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(key.to_string(), messages::REQUIRED_FIELD.to_string());
    }
}

/// Devuelve `ruta del campo -> mensaje`; vacío si el borrador puede enviarse
pub fn validate_draft(draft: &OrderDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let header = &draft.header;

    require(&mut errors, "order_number", &header.order_number);
    require(&mut errors, "invoice", &header.invoice);
    require(&mut errors, "track_number", &header.track_number);
    require(&mut errors, "cargo_type", &header.cargo_type);
    require(&mut errors, "cargo_weight", &header.cargo_weight);

    let order_date = header.order_date.trim();
    if order_date.is_empty() {
        errors.insert("order_date".to_string(), messages::REQUIRED_FIELD.to_string());
    } else if order_date.len() != 10 || iso_to_display(order_date).is_none() {
        errors.insert("order_date".to_string(), messages::INVALID_DATE.to_string());
    }

    if !draft.customer_items.iter().any(|item| item.customer_id.is_some()) {
        errors.insert("customer_items".to_string(), messages::ADD_CUSTOMER.to_string());
    }
    for (i, item) in draft.customer_items.iter().enumerate() {
        if item.customer_id.is_none() {
            errors.insert(format!("customer_{}_id", i), messages::SELECT_CUSTOMER.to_string());
        }
    }

    for (i, stage) in draft.stages.iter().enumerate() {
        require(&mut errors, &format!("stage_{}_from", i), &stage.from_location);
        require(&mut errors, &format!("stage_{}_to", i), &stage.to_location);

        match (stage.vehicle_id, stage.driver_id) {
            (None, _) => {
                errors.insert(format!("stage_{}_vehicle", i), messages::REQUIRED_FIELD.to_string());
            }
            (Some(_), None) => {
                errors.insert(
                    format!("stage_{}_driver", i),
                    messages::SELECT_VEHICLE_WITH_DRIVER.to_string(),
                );
            }
            (Some(_), Some(_)) => {}
        }

        let departure = stage.planned_departure.trim();
        if departure.is_empty() {
            errors.insert(format!("stage_{}_date", i), messages::REQUIRED_FIELD.to_string());
        } else if parse_display_date(departure).is_none() {
            errors.insert(format!("stage_{}_date", i), messages::INVALID_DATE.to_string());
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::test_catalog;
    use crate::models::{CustomerItemField, Direction, HeaderField, StageField};
    use chrono::NaiveDate;

    /// Borrador completo y válido con una etapa
    fn valid_draft() -> OrderDraft {
        let catalog = test_catalog();
        let mut draft = OrderDraft::new(Direction::EU, NaiveDate::from_ymd_opt(2024, 12, 17).unwrap());
        draft.set_header_field(HeaderField::OrderNumber, "EU17122024-001").unwrap();
        draft.set_header_field(HeaderField::Invoice, "INV-9").unwrap();
        draft.set_header_field(HeaderField::TrackNumber, "TRK-1").unwrap();
        draft.set_header_field(HeaderField::CargoType, "Паллеты").unwrap();
        draft.set_header_field(HeaderField::CargoWeight, "20000").unwrap();
        draft.update_customer_item(0, CustomerItemField::CustomerId, "3").unwrap();

        let id = draft.add_stage().id.clone();
        draft.update_stage(&id, StageField::FromLocation, "Минск", &catalog).unwrap();
        draft.update_stage(&id, StageField::ToLocation, "Варшава", &catalog).unwrap();
        draft.update_stage(&id, StageField::VehicleId, "1", &catalog).unwrap();
        draft.update_stage(&id, StageField::PlannedDeparture, "20-12-2024", &catalog).unwrap();
        draft
    }

    #[test]
    fn test_valid_draft_has_no_errors() {
        assert!(validate_draft(&valid_draft()).is_empty());
    }

    #[test]
    fn test_missing_customer_blocks() {
        let mut draft = valid_draft();
        draft.update_customer_item(0, CustomerItemField::CustomerId, "").unwrap();

        let errors = validate_draft(&draft);
        assert_eq!(errors.get("customer_items").map(String::as_str), Some(messages::ADD_CUSTOMER));
        assert_eq!(errors.get("customer_0_id").map(String::as_str), Some(messages::SELECT_CUSTOMER));
    }

    #[test]
    fn test_header_required_fields() {
        let draft = OrderDraft::new(Direction::EU, NaiveDate::from_ymd_opt(2024, 12, 17).unwrap());
        let errors = validate_draft(&draft);
        for key in ["order_number", "invoice", "track_number", "cargo_type", "cargo_weight"] {
            assert_eq!(errors.get(key).map(String::as_str), Some(messages::REQUIRED_FIELD), "{}", key);
        }
        assert!(!errors.contains_key("order_date"));
    }

    #[test]
    fn test_invalid_order_date() {
        let mut draft = valid_draft();
        draft.set_header_field(HeaderField::OrderDate, "31-02-2024").unwrap();
        assert_eq!(
            validate_draft(&draft).get("order_date").map(String::as_str),
            Some(messages::INVALID_DATE)
        );
    }

    #[test]
    fn test_vehicle_without_driver_is_reported_as_driver_error() {
        let catalog = test_catalog();
        let mut draft = valid_draft();
        let id = draft.stages[0].id.clone();
        draft.update_stage(&id, StageField::VehicleId, "2", &catalog).unwrap();

        let errors = validate_draft(&draft);
        assert_eq!(
            errors.get("stage_0_driver").map(String::as_str),
            Some(messages::SELECT_VEHICLE_WITH_DRIVER)
        );
        assert!(!errors.contains_key("stage_0_vehicle"));

        draft.update_stage(&id, StageField::VehicleId, "", &catalog).unwrap();
        let errors = validate_draft(&draft);
        assert!(errors.contains_key("stage_0_vehicle"));
        assert!(!errors.contains_key("stage_0_driver"));
    }

    #[test]
    fn test_stage_date_and_locations() {
        let catalog = test_catalog();
        let mut draft = valid_draft();
        let id = draft.add_stage().id.clone();
        draft.update_stage(&id, StageField::PlannedDeparture, "1212", &catalog).unwrap();

        let errors = validate_draft(&draft);
        // el origen se hereda del destino anterior
        assert!(!errors.contains_key("stage_1_from"));
        assert!(errors.contains_key("stage_1_to"));
        assert_eq!(errors.get("stage_1_date").map(String::as_str), Some(messages::INVALID_DATE));
    }
}
