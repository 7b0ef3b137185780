use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::composer::{validate_draft, DialogState, OrderComposer, OrderDraft};
use crate::models::{CustomerItemField, Direction, HeaderField, StageField, WaypointField};
use crate::utils::errors::{AppResult, FieldErrors};
use crate::utils::validation::deserialize_string_or_number;

// Request para abrir un borrador nuevo
#[derive(Debug, Default, Deserialize)]
pub struct OpenDraftRequest {
    #[serde(default)]
    pub direction: Option<Direction>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionRequest {
    pub direction: Direction,
}

// Cambios de un solo campo. El valor admite número o texto.
#[derive(Debug, Deserialize)]
pub struct FieldUpdate<F> {
    pub field: F,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub value: String,
}

pub type HeaderUpdateRequest = FieldUpdate<HeaderField>;
pub type CustomerItemUpdateRequest = FieldUpdate<CustomerItemField>;
pub type StageUpdateRequest = FieldUpdate<StageField>;
pub type WaypointUpdateRequest = FieldUpdate<WaypointField>;

#[derive(Debug, Deserialize)]
pub struct CustomsUpdateRequest {
    #[serde(default)]
    pub customs_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitDraftRequest {
    #[serde(default)]
    pub confirm_without_route: bool,
}

// Vista del borrador: estado, ruta derivada y errores actuales
#[derive(Debug, Serialize)]
pub struct DraftView {
    pub id: Uuid,
    pub state: DialogState,
    pub route: String,
    pub errors: FieldErrors,
    #[serde(flatten)]
    pub draft: OrderDraft,
}

impl DraftView {
    pub fn from_composer(id: Uuid, composer: &OrderComposer) -> AppResult<Self> {
        let draft = composer.draft()?;
        Ok(Self {
            id,
            state: composer.state(),
            route: draft.route(),
            errors: validate_draft(draft),
            draft: draft.clone(),
        })
    }
}

// Id local creado dentro de una etapa (punto intermedio o aduana)
#[derive(Debug, Serialize)]
pub struct CreatedItem {
    pub item_id: String,
    pub draft: DraftView,
}

#[derive(Debug, Serialize)]
pub struct ValidationView {
    pub valid: bool,
    pub errors: FieldErrors,
}
