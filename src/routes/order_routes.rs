use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde_json::Value;

use crate::controllers::order_controller::OrderController;
use crate::dto::api_response::ApiResponse;
use crate::middleware::ActingUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_order_router() -> Router<AppState> {
    Router::new()
        .route("/:id", delete(delete_order))
        .route("/:id/stages", get(order_stages))
}

async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ActingUser(actor): ActingUser,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = OrderController::new(&state);
    Ok(Json(controller.delete(id, actor).await?))
}

async fn order_stages(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let controller = OrderController::new(&state);
    Ok(Json(controller.stages(id).await?))
}
