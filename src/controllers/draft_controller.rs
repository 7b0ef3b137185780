use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::composer::{
    next_sequence, Actor, OrderComposer, OrderDraft, PendingSubmit, ReferenceCatalog, SubmitOutcome,
    SubmitStep,
};
use crate::dto::api_response::ApiResponse;
use crate::dto::draft_dto::{
    CreatedItem, CustomerItemUpdateRequest, CustomsUpdateRequest, DirectionRequest, DraftView,
    HeaderUpdateRequest, OpenDraftRequest, StageUpdateRequest, SubmitDraftRequest, ValidationView,
    WaypointUpdateRequest,
};
use crate::models::{Attachment, Direction, ExistingOrder, Resource, StageField};
use crate::services::{ReferenceService, UploadedFile};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::messages;

pub struct DraftController {
    state: AppState,
}

impl DraftController {
    pub fn new(state: &AppState) -> Self {
        Self { state: state.clone() }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Aplica un cambio al borrador y devuelve la vista actualizada
    async fn mutate<F>(&self, id: Uuid, f: F) -> Result<DraftView, AppError>
    where
        F: FnOnce(&mut OrderDraft) -> Result<(), AppError>,
    {
        self.state
            .with_composer(id, |composer| {
                f(composer.draft_mut()?)?;
                DraftView::from_composer(id, composer)
            })
            .await
    }

    /// Como `mutate`, pero el cambio crea un elemento cuyo id se devuelve
    async fn create_item<F>(&self, id: Uuid, f: F) -> Result<ApiResponse<CreatedItem>, AppError>
    where
        F: FnOnce(&mut OrderDraft) -> Result<String, AppError>,
    {
        let created = self
            .state
            .with_composer(id, |composer| {
                let item_id = f(composer.draft_mut()?)?;
                Ok(CreatedItem {
                    item_id,
                    draft: DraftView::from_composer(id, composer)?,
                })
            })
            .await?;
        Ok(ApiResponse::success(created))
    }

    pub async fn open(&self, request: OpenDraftRequest) -> Result<ApiResponse<DraftView>, AppError> {
        let direction = request.direction.unwrap_or_default();
        let today = Self::today();

        let mut draft = OrderDraft::new(direction, today);
        let sequence = next_sequence(self.state.gateway.as_ref(), direction, today).await;
        draft.apply_order_number(today, &sequence);

        let mut composer = OrderComposer::new();
        composer.open_new(draft);
        let id = self.state.store_composer(composer).await;
        tracing::info!("📝 Nuevo borrador {} ({})", id, direction);

        let view = self.state.with_composer(id, |c| DraftView::from_composer(id, c)).await?;
        Ok(ApiResponse::success(view))
    }

    pub async fn open_edit(&self, order: ExistingOrder) -> Result<ApiResponse<DraftView>, AppError> {
        let order_id = order.id;
        let catalog = ReferenceService::from_state(&self.state).catalog().await?;

        let mut composer = OrderComposer::new();
        composer.open_editing(OrderDraft::from_existing(order, &catalog));
        let id = self.state.store_composer(composer).await;
        tracing::info!("✏️ Pedido {} abierto para edición en el borrador {}", order_id, id);

        let view = self.state.with_composer(id, |c| DraftView::from_composer(id, c)).await?;
        Ok(ApiResponse::success(view))
    }

    pub async fn get(&self, id: Uuid) -> Result<DraftView, AppError> {
        self.state
            .with_composer(id, |composer| DraftView::from_composer(id, composer))
            .await
    }

    pub async fn close(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.state.close_composer(id).await?;
        Ok(ApiResponse::message(messages::DRAFT_CLOSED))
    }

    pub async fn update_header(
        &self,
        id: Uuid,
        request: HeaderUpdateRequest,
    ) -> Result<ApiResponse<DraftView>, AppError> {
        let view = self
            .mutate(id, |draft| draft.set_header_field(request.field, &request.value))
            .await?;
        Ok(ApiResponse::success(view))
    }

    /// Cambiar la dirección regenera el número de pedido
    pub async fn change_direction(
        &self,
        id: Uuid,
        request: DirectionRequest,
    ) -> Result<ApiResponse<DraftView>, AppError> {
        let direction: Direction = request.direction;
        self.mutate(id, |draft| draft.set_direction(direction)).await?;

        let today = Self::today();
        let sequence = next_sequence(self.state.gateway.as_ref(), direction, today).await;

        let view = self
            .mutate(id, |draft| {
                // El operador pudo cambiar otra vez la dirección mientras se esperaba el número
                if draft.direction == direction {
                    draft.apply_order_number(today, &sequence);
                }
                Ok(())
            })
            .await?;
        Ok(ApiResponse::success(view))
    }

    pub async fn add_customer_item(&self, id: Uuid) -> Result<ApiResponse<CreatedItem>, AppError> {
        self.create_item(id, |draft| Ok(draft.add_customer_item().to_string()))
            .await
    }

    pub async fn update_customer_item(
        &self,
        id: Uuid,
        index: usize,
        request: CustomerItemUpdateRequest,
    ) -> Result<ApiResponse<DraftView>, AppError> {
        let view = self
            .mutate(id, |draft| {
                draft.update_customer_item(index, request.field, &request.value)
            })
            .await?;
        Ok(ApiResponse::success(view))
    }

    pub async fn remove_customer_item(
        &self,
        id: Uuid,
        index: usize,
    ) -> Result<ApiResponse<DraftView>, AppError> {
        let view = self.mutate(id, |draft| draft.remove_customer_item(index)).await?;
        Ok(ApiResponse::success(view))
    }

    pub async fn add_stage(&self, id: Uuid) -> Result<ApiResponse<CreatedItem>, AppError> {
        self.create_item(id, |draft| Ok(draft.add_stage().id.clone()))
            .await
    }

    /// Elegir vehículo necesita el catálogo; el resto de campos no
    pub async fn update_stage(
        &self,
        id: Uuid,
        stage_id: String,
        request: StageUpdateRequest,
    ) -> Result<ApiResponse<DraftView>, AppError> {
        let catalog = if request.field == StageField::VehicleId {
            ReferenceService::from_state(&self.state).catalog().await?
        } else {
            ReferenceCatalog::default()
        };

        let view = self
            .mutate(id, |draft| {
                draft.update_stage(&stage_id, request.field, &request.value, &catalog)
            })
            .await?;
        Ok(ApiResponse::success(view))
    }

    pub async fn remove_stage(&self, id: Uuid, stage_id: String) -> Result<ApiResponse<DraftView>, AppError> {
        let view = self.mutate(id, |draft| draft.remove_stage(&stage_id)).await?;
        Ok(ApiResponse::success(view))
    }

    pub async fn add_waypoint(&self, id: Uuid, stage_id: String) -> Result<ApiResponse<CreatedItem>, AppError> {
        self.create_item(id, |draft| draft.add_waypoint(&stage_id)).await
    }

    pub async fn update_waypoint(
        &self,
        id: Uuid,
        stage_id: String,
        waypoint_id: String,
        request: WaypointUpdateRequest,
    ) -> Result<ApiResponse<DraftView>, AppError> {
        let view = self
            .mutate(id, |draft| {
                draft.update_waypoint(&stage_id, &waypoint_id, request.field, &request.value)
            })
            .await?;
        Ok(ApiResponse::success(view))
    }

    pub async fn remove_waypoint(
        &self,
        id: Uuid,
        stage_id: String,
        waypoint_id: String,
    ) -> Result<ApiResponse<DraftView>, AppError> {
        let view = self
            .mutate(id, |draft| draft.remove_waypoint(&stage_id, &waypoint_id))
            .await?;
        Ok(ApiResponse::success(view))
    }

    pub async fn add_customs(&self, id: Uuid, stage_id: String) -> Result<ApiResponse<CreatedItem>, AppError> {
        self.create_item(id, |draft| draft.add_customs(&stage_id)).await
    }

    pub async fn update_customs(
        &self,
        id: Uuid,
        stage_id: String,
        customs_id: String,
        request: CustomsUpdateRequest,
    ) -> Result<ApiResponse<DraftView>, AppError> {
        let view = self
            .mutate(id, |draft| {
                draft.update_customs(&stage_id, &customs_id, &request.customs_name)
            })
            .await?;
        Ok(ApiResponse::success(view))
    }

    pub async fn remove_customs(
        &self,
        id: Uuid,
        stage_id: String,
        customs_id: String,
    ) -> Result<ApiResponse<DraftView>, AppError> {
        let view = self
            .mutate(id, |draft| draft.remove_customs(&stage_id, &customs_id))
            .await?;
        Ok(ApiResponse::success(view))
    }

    pub async fn attach_files(
        &self,
        id: Uuid,
        files: Vec<UploadedFile>,
    ) -> Result<ApiResponse<DraftView>, AppError> {
        let count = files.len();
        let view = self
            .mutate(id, |draft| {
                for file in files {
                    draft.attach(Attachment::from_bytes(
                        &file.name,
                        file.content_type.as_deref(),
                        &file.bytes,
                    ))?;
                }
                Ok(())
            })
            .await?;
        tracing::info!("📎 {} archivo(s) adjuntados al borrador {}", count, id);
        Ok(ApiResponse::success_with_message(view, messages::FILES_ADDED))
    }

    pub async fn remove_attachment(&self, id: Uuid, index: usize) -> Result<ApiResponse<DraftView>, AppError> {
        let view = self
            .mutate(id, |draft| draft.remove_attachment(index).map(|_| ()))
            .await?;
        Ok(ApiResponse::success(view))
    }

    pub async fn validation(&self, id: Uuid) -> Result<ValidationView, AppError> {
        let view = self.get(id).await?;
        Ok(ValidationView {
            valid: view.errors.is_empty(),
            errors: view.errors,
        })
    }

    /// El lock del borrador no se mantiene mientras se espera al servicio:
    /// el estado `submitting` rechaza cambios y un segundo envío.
    pub async fn submit(
        &self,
        id: Uuid,
        actor: Actor,
        request: SubmitDraftRequest,
    ) -> Result<ApiResponse<SubmitOutcome>, AppError> {
        let step = self
            .state
            .with_composer(id, |composer| {
                composer.begin_submit(&actor, request.confirm_without_route)
            })
            .await?;

        let pending = match step {
            SubmitStep::RouteSuggested => {
                tracing::info!("🛣️ Borrador {} sin etapas: se sugiere añadir la ruta", id);
                return Ok(ApiResponse::success(SubmitOutcome::RouteSuggested {
                    message: messages::ROUTE_SUGGESTED.to_string(),
                }));
            }
            SubmitStep::Send(pending) => pending,
        };

        tracing::info!("📤 Enviando borrador {} (pedido {:?})", id, pending.order_id);

        // La tarea sigue aunque el cliente se desconecte, así el borrador
        // siempre sale de `submitting`
        let task = tokio::spawn(deliver(self.state.clone(), id, pending));
        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("❌ Tarea de envío del borrador {} interrumpida: {}", id, e);
                Err(AppError::Internal(format!("Envío interrumpido: {}", e)))
            }
        };

        match outcome {
            Ok(outcome) => {
                let message = match &outcome {
                    SubmitOutcome::Created { message, .. }
                    | SubmitOutcome::Updated { message, .. }
                    | SubmitOutcome::RouteSuggested { message } => message.clone(),
                };
                Ok(ApiResponse::success_with_message(outcome, &message))
            }
            Err(e) => {
                tracing::warn!("❌ Envío del borrador {} fallido: {}", id, e);
                Err(e)
            }
        }
    }
}

/// Llama al servicio y cierra o reabre el borrador según la respuesta
async fn deliver(state: AppState, id: Uuid, pending: PendingSubmit) -> Result<SubmitOutcome, AppError> {
    let reply = state.gateway.post_action(pending.body).await;
    let accepted = matches!(&reply, Ok(r) if r.is_success());

    let mut refresh = false;
    let outcome = state
        .with_composer(id, |composer| composer.finish_submit(reply, || refresh = true))
        .await;

    // Con el borrador ya cerrado el callback no corre, pero el pedido sí cambió
    if refresh || accepted {
        let references = ReferenceService::from_state(&state);
        references.invalidate(Resource::Orders).await;
        references.invalidate(Resource::OrderStages).await;
    }

    match outcome {
        Ok(outcome) => {
            state.remove_composer(id).await;
            tracing::info!("✅ Borrador {} enviado: {:?}", id, outcome);
            Ok(outcome)
        }
        Err(AppError::NotFound(_)) => {
            tracing::warn!("⚠️ Borrador {} cerrado antes de la respuesta; se descarta", id);
            Err(not_found_error(messages::DRAFT_NOT_FOUND))
        }
        Err(e) => Err(e),
    }
}
