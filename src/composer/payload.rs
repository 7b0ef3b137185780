//! Traducción del borrador a las peticiones del servicio de pedidos
//!
//! Alta: `create_multi_stage_order` con `data.{order, stages, customs_points}`.
//! Edición: `update_order` con `order_id` y las mismas piezas en el nivel superior.

use serde::Serialize;

use crate::composer::draft::OrderDraft;
use crate::models::{Attachment, CustomerItem, Stage, WaypointType};
use crate::utils::validation::display_to_iso;

pub const CREATE_ACTION: &str = "create_multi_stage_order";
pub const UPDATE_ACTION: &str = "update_order";

/// Usuario que actúa, reenviado en altas y ediciones
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Actor {
    pub user_role: String,
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundOrder {
    pub order_number: String,
    pub client_id: Option<i64>,
    pub order_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    pub customer_items: Vec<CustomerItem>,
    pub cargo_type: Option<String>,
    pub cargo_weight: Option<String>,
    pub invoice: Option<String>,
    pub track_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundWaypoint {
    pub waypoint_order: u32,
    pub location: String,
    pub waypoint_type: WaypointType,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundStage {
    pub stage_number: u32,
    pub vehicle_id: Option<i64>,
    pub driver_id: Option<i64>,
    pub from_location: String,
    pub to_location: String,
    /// ISO `YYYY-MM-DD`; nulo si la fecha no es válida
    pub planned_departure: Option<String>,
    pub waypoints: Vec<OutboundWaypoint>,
    pub notes: String,
}

/// Paso de aduana: país y fecha viajan vacíos
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundCustoms {
    pub customs_name: String,
    pub country: String,
    pub crossing_date: Option<String>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateOrderData {
    pub order: OutboundOrder,
    pub stages: Vec<OutboundStage>,
    pub customs_points: Vec<OutboundCustoms>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateOrderRequest {
    pub action: &'static str,
    pub user_role: String,
    pub user_name: String,
    pub data: CreateOrderData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateOrderRequest {
    pub action: &'static str,
    pub order_id: i64,
    pub order: OutboundOrder,
    pub stages: Vec<OutboundStage>,
    pub customs_points: Vec<OutboundCustoms>,
    pub user_role: String,
    pub user_name: String,
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn outbound_order(draft: &OrderDraft) -> OutboundOrder {
    let header = &draft.header;
    let creating = !draft.is_editing();
    OutboundOrder {
        order_number: header.order_number.trim().to_string(),
        client_id: None,
        order_date: header.order_date.clone(),
        status: creating.then(|| "pending".to_string()),
        attachments: creating.then(|| draft.attachments.clone()),
        customer_items: draft.customer_items.clone(),
        cargo_type: optional_text(&header.cargo_type),
        cargo_weight: optional_text(&header.cargo_weight),
        invoice: optional_text(&header.invoice),
        track_number: optional_text(&header.track_number),
        notes: optional_text(&header.notes),
    }
}

fn outbound_stage(stage: &Stage) -> OutboundStage {
    OutboundStage {
        stage_number: stage.stage_number,
        vehicle_id: stage.vehicle_id,
        driver_id: stage.driver_id,
        from_location: stage.from_location.trim().to_string(),
        to_location: stage.to_location.trim().to_string(),
        planned_departure: display_to_iso(stage.planned_departure.trim()),
        waypoints: stage
            .sorted_waypoints()
            .into_iter()
            .map(|w| OutboundWaypoint {
                waypoint_order: w.waypoint_order,
                location: w.location.trim().to_string(),
                waypoint_type: w.waypoint_type,
                notes: w.notes.clone(),
            })
            .collect(),
        notes: stage.notes.clone(),
    }
}

/// Aduanas de todas las etapas en orden; las que no tienen nombre se omiten
pub fn flatten_customs(stages: &[Stage]) -> Vec<OutboundCustoms> {
    stages
        .iter()
        .flat_map(|s| s.customs.iter())
        .filter(|c| !c.customs_name.trim().is_empty())
        .map(|c| OutboundCustoms {
            customs_name: c.customs_name.trim().to_string(),
            country: String::new(),
            crossing_date: None,
            notes: String::new(),
        })
        .collect()
}

pub fn create_request(draft: &OrderDraft, actor: &Actor) -> CreateOrderRequest {
    CreateOrderRequest {
        action: CREATE_ACTION,
        user_role: actor.user_role.clone(),
        user_name: actor.user_name.clone(),
        data: CreateOrderData {
            order: outbound_order(draft),
            stages: draft.stages.iter().map(outbound_stage).collect(),
            customs_points: flatten_customs(&draft.stages),
        },
    }
}

pub fn update_request(draft: &OrderDraft, order_id: i64, actor: &Actor) -> UpdateOrderRequest {
    UpdateOrderRequest {
        action: UPDATE_ACTION,
        order_id,
        order: outbound_order(draft),
        stages: draft.stages.iter().map(outbound_stage).collect(),
        customs_points: flatten_customs(&draft.stages),
        user_role: actor.user_role.clone(),
        user_name: actor.user_name.clone(),
    }
}
