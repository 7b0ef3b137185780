//! Borrador de pedido multietapa
//!
//! Mantiene la cabecera, las líneas de clientes, las etapas (con sus puntos
//! intermedios y aduanas) y los adjuntos mientras el operador compone el
//! pedido. Toda mutación pasa por aquí; la ruta se deriva bajo demanda.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::composer::catalog::ReferenceCatalog;
use crate::composer::route::derive_route;
use crate::models::{
    format_order_number, Attachment, CustomerItem, CustomerItemField, Customs, Direction,
    ExistingOrder, ExistingStage, HeaderField, OrderHeader, Stage, StageField, Waypoint,
    WaypointField, WaypointType,
};
use crate::utils::errors::{bad_request_error, forbidden_error, not_found_error, AppResult};
use crate::utils::messages;
use crate::utils::validation::{
    display_to_iso, iso_to_display, normalize_date_input, parse_optional_id, ISO_DATE_FORMAT,
};

/// Prefijo de los ids locales de etapas que ya existen en el servicio
pub const EXISTING_STAGE_PREFIX: &str = "existing_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DraftMode {
    Create,
    Edit { order_id: i64 },
}

/// Ids locales: milisegundos actuales, forzados a crecer dentro del borrador
#[derive(Debug, Clone, Default)]
struct LocalIds {
    last: i64,
}

impl LocalIds {
    fn next(&mut self) -> String {
        let id = Utc::now().timestamp_millis().max(self.last + 1);
        self.last = id;
        id.to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDraft {
    pub mode: DraftMode,
    pub direction: Direction,
    pub header: OrderHeader,
    pub customer_items: Vec<CustomerItem>,
    pub stages: Vec<Stage>,
    pub attachments: Vec<Attachment>,
    /// Campos bloqueados en edición que llegaron vacíos y aún se pueden completar
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fillable_fields: Vec<HeaderField>,
    #[serde(skip)]
    ids: LocalIds,
}

impl OrderDraft {
    /// Borrador vacío para un pedido nuevo: fecha de hoy, una línea de
    /// cliente vacía y sin etapas. El número se asigna aparte.
    pub fn new(direction: Direction, today: NaiveDate) -> Self {
        Self {
            mode: DraftMode::Create,
            direction,
            header: OrderHeader {
                order_date: today.format(ISO_DATE_FORMAT).to_string(),
                ..Default::default()
            },
            customer_items: vec![CustomerItem::default()],
            stages: Vec::new(),
            attachments: Vec::new(),
            fillable_fields: Vec::new(),
            ids: LocalIds::default(),
        }
    }

    /// Abre un pedido existente en modo edición
    pub fn from_existing(order: ExistingOrder, catalog: &ReferenceCatalog) -> Self {
        let direction = order
            .order_number
            .get(..2)
            .and_then(|prefix| prefix.parse().ok())
            .unwrap_or_default();

        let mut customer_items = order.customer_items;
        if customer_items.is_empty() {
            customer_items.push(CustomerItem::default());
        }

        let mut draft = Self {
            mode: DraftMode::Edit { order_id: order.id },
            direction,
            header: OrderHeader {
                order_number: order.order_number,
                order_date: stored_order_date(&order.order_date),
                cargo_type: order.cargo_type,
                cargo_weight: order.cargo_weight,
                invoice: order.invoice,
                track_number: order.track_number,
                notes: order.notes,
            },
            customer_items,
            stages: Vec::new(),
            attachments: Vec::new(),
            fillable_fields: Vec::new(),
            ids: LocalIds::default(),
        };
        draft.fillable_fields = HeaderField::ALL
            .into_iter()
            .filter(|f| f.locked_when_editing() && draft.header.value(*f).trim().is_empty())
            .collect();

        for (index, existing) in order.stages.into_iter().enumerate() {
            let stage = draft.stage_from_existing(index, existing, catalog);
            draft.stages.push(stage);
        }
        draft
    }

    fn stage_from_existing(
        &mut self,
        index: usize,
        existing: ExistingStage,
        catalog: &ReferenceCatalog,
    ) -> Stage {
        let mut stage = Stage::new(
            format!("{}{}", EXISTING_STAGE_PREFIX, existing.id),
            existing.stage_number.unwrap_or(index as u32 + 1),
            existing.from_location,
        );
        stage.to_location = existing.to_location;
        stage.planned_departure = iso_to_display(&existing.planned_departure).unwrap_or_default();
        stage.vehicle_id = existing.vehicle_id;
        stage.driver_id = existing.driver_id;
        if let Some(driver) = existing.driver_id.and_then(|id| catalog.driver(id)) {
            stage.driver_phone = driver.phone.clone();
            stage.driver_additional_phone = driver.additional_phone.clone();
        }
        stage.notes = existing.notes;
        stage.started = existing.started;

        for waypoint in existing.waypoints {
            let id = match waypoint.id {
                Some(id) => id.to_string(),
                None => self.ids.next(),
            };
            stage.waypoints.push(Waypoint {
                id,
                waypoint_order: waypoint.waypoint_order,
                location: waypoint.location,
                waypoint_type: waypoint.waypoint_type.parse().unwrap_or_default(),
                notes: waypoint.notes,
            });
        }

        for customs in existing.customs_points {
            let id = match customs.id {
                Some(id) => id.to_string(),
                None => self.ids.next(),
            };
            stage.customs.push(Customs {
                id,
                customs_name: customs.customs_name,
            });
        }
        stage
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, DraftMode::Edit { .. })
    }

    pub fn order_id(&self) -> Option<i64> {
        match self.mode {
            DraftMode::Create => None,
            DraftMode::Edit { order_id } => Some(order_id),
        }
    }

    pub fn route(&self) -> String {
        derive_route(&self.stages)
    }

    // --- cabecera ---

    /// En edición sólo se completan los campos que el pedido guardado tenía vacíos
    pub fn is_field_locked(&self, field: HeaderField) -> bool {
        self.is_editing() && field.locked_when_editing() && !self.fillable_fields.contains(&field)
    }

    /// La fecha del pedido admite `DD-MM-YYYY` o ISO y se guarda en ISO
    pub fn set_header_field(&mut self, field: HeaderField, value: &str) -> AppResult<()> {
        if self.is_field_locked(field) {
            return Err(forbidden_error(messages::FIELD_LOCKED));
        }

        let value = value.to_string();
        match field {
            HeaderField::OrderNumber => self.header.order_number = value,
            HeaderField::OrderDate => self.header.order_date = stored_order_date(&value),
            HeaderField::CargoType => self.header.cargo_type = value,
            HeaderField::CargoWeight => self.header.cargo_weight = value,
            HeaderField::Invoice => self.header.invoice = value,
            HeaderField::TrackNumber => self.header.track_number = value,
            HeaderField::Notes => self.header.notes = value,
        }
        Ok(())
    }

    /// Cambia la dirección de un pedido nuevo. El número debe regenerarse después.
    pub fn set_direction(&mut self, direction: Direction) -> AppResult<()> {
        if self.is_editing() {
            return Err(forbidden_error(messages::FIELD_LOCKED));
        }
        self.direction = direction;
        Ok(())
    }

    pub fn apply_order_number(&mut self, date: NaiveDate, sequence: &str) {
        self.header.order_number = format_order_number(self.direction, date, sequence);
    }

    // --- líneas de clientes ---

    pub fn add_customer_item(&mut self) -> usize {
        self.customer_items.push(CustomerItem::default());
        self.customer_items.len() - 1
    }

    pub fn remove_customer_item(&mut self, index: usize) -> AppResult<()> {
        if index >= self.customer_items.len() {
            return Err(not_found_error(messages::CUSTOMER_ITEM_NOT_FOUND));
        }
        if self.customer_items.len() == 1 {
            return Err(bad_request_error(messages::LAST_CUSTOMER_ITEM));
        }
        self.customer_items.remove(index);
        Ok(())
    }

    pub fn update_customer_item(
        &mut self,
        index: usize,
        field: CustomerItemField,
        value: &str,
    ) -> AppResult<()> {
        let item = self
            .customer_items
            .get_mut(index)
            .ok_or_else(|| not_found_error(messages::CUSTOMER_ITEM_NOT_FOUND))?;

        match field {
            CustomerItemField::CustomerId => {
                item.customer_id =
                    parse_optional_id(value).map_err(|_| bad_request_error(messages::INVALID_CUSTOMER))?;
            }
            CustomerItemField::Note => item.note = value.to_string(),
        }
        Ok(())
    }

    // --- etapas ---

    /// Añade una etapa al final; su origen es el destino de la anterior
    pub fn add_stage(&mut self) -> &Stage {
        let from = self
            .stages
            .last()
            .map(|s| s.to_location.clone())
            .unwrap_or_default();
        let id = self.ids.next();
        let number = self.stages.len() as u32 + 1;
        self.stages.push(Stage::new(id, number, from));
        &self.stages[self.stages.len() - 1]
    }

    pub fn remove_stage(&mut self, stage_id: &str) -> AppResult<()> {
        let position = self
            .stages
            .iter()
            .position(|s| s.id == stage_id)
            .ok_or_else(|| not_found_error(messages::STAGE_NOT_FOUND))?;

        if self.stages[position].started {
            return Err(forbidden_error(messages::STAGE_STARTED));
        }

        self.stages.remove(position);
        for (index, stage) in self.stages.iter_mut().enumerate() {
            stage.stage_number = index as u32 + 1;
        }
        Ok(())
    }

    /// Elegir vehículo rellena en la misma operación el conductor asignado y
    /// sus dos teléfonos; un vehículo sin conductor los deja vacíos.
    pub fn update_stage(
        &mut self,
        stage_id: &str,
        field: StageField,
        value: &str,
        catalog: &ReferenceCatalog,
    ) -> AppResult<()> {
        let stage = self.stage_mut(stage_id)?;

        match field {
            StageField::FromLocation => stage.from_location = value.to_string(),
            StageField::ToLocation => stage.to_location = value.to_string(),
            StageField::PlannedDeparture => stage.planned_departure = departure_input(value),
            StageField::Notes => stage.notes = value.to_string(),
            StageField::VehicleId => {
                let vehicle_id =
                    parse_optional_id(value).map_err(|_| bad_request_error(messages::INVALID_VEHICLE))?;
                if let Some(id) = vehicle_id {
                    if catalog.vehicle(id).is_none() {
                        return Err(bad_request_error(messages::INVALID_VEHICLE));
                    }
                }

                stage.vehicle_id = vehicle_id;
                match vehicle_id.and_then(|id| catalog.assigned_driver(id)) {
                    Some(driver) => {
                        stage.driver_id = Some(driver.id);
                        stage.driver_phone = driver.phone.clone();
                        stage.driver_additional_phone = driver.additional_phone.clone();
                    }
                    None => stage.clear_driver(),
                }
            }
        }
        Ok(())
    }

    pub fn stage(&self, stage_id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == stage_id)
    }

    fn stage_mut(&mut self, stage_id: &str) -> AppResult<&mut Stage> {
        self.stages
            .iter_mut()
            .find(|s| s.id == stage_id)
            .ok_or_else(|| not_found_error(messages::STAGE_NOT_FOUND))
    }

    // --- puntos intermedios ---

    pub fn add_waypoint(&mut self, stage_id: &str) -> AppResult<String> {
        let id = self.ids.next();
        let stage = self.stage_mut(stage_id)?;
        let waypoint_order = stage.next_waypoint_order();
        stage.waypoints.push(Waypoint {
            id: id.clone(),
            waypoint_order,
            location: String::new(),
            waypoint_type: WaypointType::default(),
            notes: String::new(),
        });
        Ok(id)
    }

    /// Borrar no compacta las claves de orden de los demás puntos
    pub fn remove_waypoint(&mut self, stage_id: &str, waypoint_id: &str) -> AppResult<()> {
        let stage = self.stage_mut(stage_id)?;
        let before = stage.waypoints.len();
        stage.waypoints.retain(|w| w.id != waypoint_id);
        if stage.waypoints.len() == before {
            return Err(not_found_error(messages::WAYPOINT_NOT_FOUND));
        }
        Ok(())
    }

    pub fn update_waypoint(
        &mut self,
        stage_id: &str,
        waypoint_id: &str,
        field: WaypointField,
        value: &str,
    ) -> AppResult<()> {
        let waypoint = self
            .stage_mut(stage_id)?
            .waypoint_mut(waypoint_id)
            .ok_or_else(|| not_found_error(messages::WAYPOINT_NOT_FOUND))?;

        match field {
            WaypointField::Location => waypoint.location = value.to_string(),
            WaypointField::Notes => waypoint.notes = value.to_string(),
            WaypointField::WaypointType => {
                waypoint.waypoint_type = value
                    .parse()
                    .map_err(|_| bad_request_error(messages::INVALID_WAYPOINT_TYPE))?;
            }
        }
        Ok(())
    }

    // --- aduanas ---

    pub fn add_customs(&mut self, stage_id: &str) -> AppResult<String> {
        let id = self.ids.next();
        let stage = self.stage_mut(stage_id)?;
        stage.customs.push(Customs {
            id: id.clone(),
            customs_name: String::new(),
        });
        Ok(id)
    }

    pub fn remove_customs(&mut self, stage_id: &str, customs_id: &str) -> AppResult<()> {
        let stage = self.stage_mut(stage_id)?;
        let before = stage.customs.len();
        stage.customs.retain(|c| c.id != customs_id);
        if stage.customs.len() == before {
            return Err(not_found_error(messages::CUSTOMS_NOT_FOUND));
        }
        Ok(())
    }

    pub fn update_customs(&mut self, stage_id: &str, customs_id: &str, name: &str) -> AppResult<()> {
        let customs = self
            .stage_mut(stage_id)?
            .customs_mut(customs_id)
            .ok_or_else(|| not_found_error(messages::CUSTOMS_NOT_FOUND))?;
        customs.customs_name = name.to_string();
        Ok(())
    }

    // --- adjuntos ---

    pub fn attach(&mut self, attachment: Attachment) -> AppResult<()> {
        if self.is_editing() {
            return Err(forbidden_error(messages::ATTACHMENTS_LOCKED));
        }
        self.attachments.push(attachment);
        Ok(())
    }

    pub fn remove_attachment(&mut self, index: usize) -> AppResult<Attachment> {
        if self.is_editing() {
            return Err(forbidden_error(messages::ATTACHMENTS_LOCKED));
        }
        if index >= self.attachments.len() {
            return Err(not_found_error(messages::ATTACHMENT_NOT_FOUND));
        }
        Ok(self.attachments.remove(index))
    }
}

/// Fecha del pedido tal como se guarda: ISO si es reconocible
/// (`DD-MM-YYYY`, `DD.MM.YYYY` o ISO), si no el texto tal cual para que la
/// validación lo marque.
fn stored_order_date(value: &str) -> String {
    let value = value.trim();
    if let Some(display) = iso_to_display(value) {
        return display_to_iso(&display).unwrap_or_default();
    }
    display_to_iso(value)
        .or_else(|| display_to_iso(&value.replace('.', "-")))
        .unwrap_or_else(|| value.to_string())
}

/// Fecha de salida: ISO se convierte a `DD-MM-YYYY`, el resto pasa por la máscara
fn departure_input(value: &str) -> String {
    iso_to_display(value.trim()).unwrap_or_else(|| normalize_date_input(value))
}
