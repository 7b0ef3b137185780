use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::composer::SubmitOutcome;
use crate::controllers::draft_controller::DraftController;
use crate::dto::api_response::ApiResponse;
use crate::dto::draft_dto::{
    CreatedItem, CustomerItemUpdateRequest, CustomsUpdateRequest, DirectionRequest, DraftView,
    HeaderUpdateRequest, OpenDraftRequest, StageUpdateRequest, SubmitDraftRequest, ValidationView,
    WaypointUpdateRequest,
};
use crate::middleware::ActingUser;
use crate::models::ExistingOrder;
use crate::services::read_files;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// `max_upload_bytes` limita el multipart de adjuntos
pub fn create_draft_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(open_draft))
        .route("/edit", post(open_edit_draft))
        .route("/:id", get(get_draft).delete(close_draft))
        .route("/:id/header", put(update_header))
        .route("/:id/direction", put(change_direction))
        .route("/:id/customers", post(add_customer_item))
        .route(
            "/:id/customers/:index",
            put(update_customer_item).delete(remove_customer_item),
        )
        .route("/:id/stages", post(add_stage))
        .route("/:id/stages/:stage_id", put(update_stage).delete(remove_stage))
        .route("/:id/stages/:stage_id/waypoints", post(add_waypoint))
        .route(
            "/:id/stages/:stage_id/waypoints/:waypoint_id",
            put(update_waypoint).delete(remove_waypoint),
        )
        .route("/:id/stages/:stage_id/customs", post(add_customs))
        .route(
            "/:id/stages/:stage_id/customs/:customs_id",
            put(update_customs).delete(remove_customs),
        )
        .route(
            "/:id/attachments",
            post(attach_files).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/:id/attachments/:index", delete(remove_attachment))
        .route("/:id/validation", get(validate_draft))
        .route("/:id/submit", post(submit_draft))
}

async fn open_draft(
    State(state): State<AppState>,
    request: Option<Json<OpenDraftRequest>>,
) -> Result<Json<ApiResponse<DraftView>>, AppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let controller = DraftController::new(&state);
    Ok(Json(controller.open(request).await?))
}

async fn open_edit_draft(
    State(state): State<AppState>,
    Json(order): Json<ExistingOrder>,
) -> Result<Json<ApiResponse<DraftView>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.open_edit(order).await?))
}

async fn get_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftView>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.get(id).await?))
}

async fn close_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.close(id).await?))
}

async fn update_header(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<HeaderUpdateRequest>,
) -> Result<Json<ApiResponse<DraftView>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.update_header(id, request).await?))
}

async fn change_direction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DirectionRequest>,
) -> Result<Json<ApiResponse<DraftView>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.change_direction(id, request).await?))
}

async fn add_customer_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CreatedItem>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.add_customer_item(id).await?))
}

async fn update_customer_item(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(request): Json<CustomerItemUpdateRequest>,
) -> Result<Json<ApiResponse<DraftView>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.update_customer_item(id, index, request).await?))
}

async fn remove_customer_item(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<ApiResponse<DraftView>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.remove_customer_item(id, index).await?))
}

async fn add_stage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CreatedItem>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.add_stage(id).await?))
}

async fn update_stage(
    State(state): State<AppState>,
    Path((id, stage_id)): Path<(Uuid, String)>,
    Json(request): Json<StageUpdateRequest>,
) -> Result<Json<ApiResponse<DraftView>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.update_stage(id, stage_id, request).await?))
}

async fn remove_stage(
    State(state): State<AppState>,
    Path((id, stage_id)): Path<(Uuid, String)>,
) -> Result<Json<ApiResponse<DraftView>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.remove_stage(id, stage_id).await?))
}

async fn add_waypoint(
    State(state): State<AppState>,
    Path((id, stage_id)): Path<(Uuid, String)>,
) -> Result<Json<ApiResponse<CreatedItem>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.add_waypoint(id, stage_id).await?))
}

async fn update_waypoint(
    State(state): State<AppState>,
    Path((id, stage_id, waypoint_id)): Path<(Uuid, String, String)>,
    Json(request): Json<WaypointUpdateRequest>,
) -> Result<Json<ApiResponse<DraftView>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(
        controller
            .update_waypoint(id, stage_id, waypoint_id, request)
            .await?,
    ))
}

async fn remove_waypoint(
    State(state): State<AppState>,
    Path((id, stage_id, waypoint_id)): Path<(Uuid, String, String)>,
) -> Result<Json<ApiResponse<DraftView>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.remove_waypoint(id, stage_id, waypoint_id).await?))
}

async fn add_customs(
    State(state): State<AppState>,
    Path((id, stage_id)): Path<(Uuid, String)>,
) -> Result<Json<ApiResponse<CreatedItem>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.add_customs(id, stage_id).await?))
}

async fn update_customs(
    State(state): State<AppState>,
    Path((id, stage_id, customs_id)): Path<(Uuid, String, String)>,
    Json(request): Json<CustomsUpdateRequest>,
) -> Result<Json<ApiResponse<DraftView>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(
        controller
            .update_customs(id, stage_id, customs_id, request)
            .await?,
    ))
}

async fn remove_customs(
    State(state): State<AppState>,
    Path((id, stage_id, customs_id)): Path<(Uuid, String, String)>,
) -> Result<Json<ApiResponse<DraftView>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.remove_customs(id, stage_id, customs_id).await?))
}

async fn attach_files(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<DraftView>>, AppError> {
    let files = read_files(multipart).await?;
    let controller = DraftController::new(&state);
    Ok(Json(controller.attach_files(id, files).await?))
}

async fn remove_attachment(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<ApiResponse<DraftView>>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.remove_attachment(id, index).await?))
}

async fn validate_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ValidationView>, AppError> {
    let controller = DraftController::new(&state);
    Ok(Json(controller.validation(id).await?))
}

async fn submit_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ActingUser(actor): ActingUser,
    request: Option<Json<SubmitDraftRequest>>,
) -> Result<Json<ApiResponse<SubmitOutcome>>, AppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let controller = DraftController::new(&state);
    Ok(Json(controller.submit(id, actor, request).await?))
}
