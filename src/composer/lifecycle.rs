//! Ciclo de vida del formulario de pedido
//!
//! `closed → open → submitting → closed`. Un envío fallido vuelve a `open`
//! con el borrador intacto; cerrar descarta el borrador.

use serde::Serialize;
use serde_json::Value;

use crate::clients::{OrderGateway, ServiceReply};
use crate::composer::draft::OrderDraft;
use crate::composer::payload::{create_request, update_request, Actor};
use crate::composer::validate::validate_draft;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    Closed,
    Open,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Created { order_id: Option<i64>, message: String },
    Updated { order_id: i64, message: String },
    /// Sin etapas: no se envía hasta que el operador lo confirme
    RouteSuggested { message: String },
}

/// Petición lista para enviar; el formulario queda en `submitting`
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmit {
    pub order_id: Option<i64>,
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStep {
    RouteSuggested,
    Send(PendingSubmit),
}

#[derive(Debug, Clone)]
pub struct OrderComposer {
    state: DialogState,
    draft: Option<OrderDraft>,
}

impl Default for OrderComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderComposer {
    pub fn new() -> Self {
        Self {
            state: DialogState::Closed,
            draft: None,
        }
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn open_new(&mut self, draft: OrderDraft) {
        self.draft = Some(draft);
        self.state = DialogState::Open;
    }

    pub fn open_editing(&mut self, draft: OrderDraft) {
        self.open_new(draft);
    }

    pub fn close(&mut self) {
        self.draft = None;
        self.state = DialogState::Closed;
    }

    pub fn draft(&self) -> AppResult<&OrderDraft> {
        self.draft
            .as_ref()
            .ok_or_else(|| AppError::Conflict(messages::DRAFT_CLOSED.to_string()))
    }

    /// Sólo se puede modificar con el formulario abierto y sin envío en curso
    pub fn draft_mut(&mut self) -> AppResult<&mut OrderDraft> {
        match self.state {
            DialogState::Submitting => Err(AppError::Conflict(messages::SUBMIT_IN_PROGRESS.to_string())),
            DialogState::Closed => Err(AppError::Conflict(messages::DRAFT_CLOSED.to_string())),
            DialogState::Open => self
                .draft
                .as_mut()
                .ok_or_else(|| AppError::Conflict(messages::DRAFT_CLOSED.to_string())),
        }
    }

    /// Valida y prepara la petición. Sin etapas y sin confirmación no se envía.
    pub fn begin_submit(&mut self, actor: &Actor, confirm_without_route: bool) -> AppResult<SubmitStep> {
        let draft = self.draft_mut()?;

        let errors = validate_draft(draft);
        if !errors.is_empty() {
            return Err(AppError::DraftInvalid(errors));
        }

        if draft.stages.is_empty() && !confirm_without_route {
            return Ok(SubmitStep::RouteSuggested);
        }

        let order_id = draft.order_id();
        let body = match order_id {
            Some(id) => serde_json::to_value(update_request(draft, id, actor)),
            None => serde_json::to_value(create_request(draft, actor)),
        }
        .map_err(|e| AppError::Internal(format!("No se pudo serializar el pedido: {}", e)))?;

        self.state = DialogState::Submitting;
        Ok(SubmitStep::Send(PendingSubmit { order_id, body }))
    }

    /// Cierra el formulario si el servicio confirmó, o lo devuelve a `open`.
    /// `on_success` se ejecuta antes de cerrar.
    pub fn finish_submit<F>(&mut self, reply: AppResult<ServiceReply>, on_success: F) -> AppResult<SubmitOutcome>
    where
        F: FnOnce(),
    {
        let order_id = self.draft.as_ref().and_then(OrderDraft::order_id);
        let fallback = match order_id {
            Some(_) => messages::ORDER_UPDATE_FAILED,
            None => messages::ORDER_CREATE_FAILED,
        };

        let body = match reply.and_then(|r| r.into_success(fallback)) {
            Ok(body) => body,
            Err(e) => {
                self.state = DialogState::Open;
                return Err(e);
            }
        };

        on_success();
        self.close();

        Ok(match order_id {
            Some(order_id) => SubmitOutcome::Updated {
                order_id,
                message: messages::ORDER_UPDATED.to_string(),
            },
            None => SubmitOutcome::Created {
                order_id: body.get("order_id").and_then(Value::as_i64),
                message: messages::ORDER_CREATED.to_string(),
            },
        })
    }

    /// Envío completo: preparar, llamar al servicio y cerrar o reabrir
    pub async fn submit<F>(
        &mut self,
        gateway: &dyn OrderGateway,
        actor: &Actor,
        confirm_without_route: bool,
        on_success: F,
    ) -> AppResult<SubmitOutcome>
    where
        F: FnOnce(),
    {
        match self.begin_submit(actor, confirm_without_route)? {
            SubmitStep::RouteSuggested => Ok(SubmitOutcome::RouteSuggested {
                message: messages::ROUTE_SUGGESTED.to_string(),
            }),
            SubmitStep::Send(pending) => {
                let reply = gateway.post_action(pending.body).await;
                self.finish_submit(reply, on_success)
            }
        }
    }
}
