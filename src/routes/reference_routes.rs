use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde_json::Value;

use crate::controllers::reference_controller::ReferenceController;
use crate::dto::api_response::ApiResponse;
use crate::dto::reference_dto::{VehicleOption, VehicleSearchQuery};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_reference_router() -> Router<AppState> {
    Router::new()
        .route("/:resource", get(list_resource).post(create_entity))
        .route("/:resource/:id", put(update_entity).delete(delete_entity))
}

pub fn create_vehicle_search_router() -> Router<AppState> {
    Router::new().route("/search", get(search_vehicles))
}

async fn list_resource(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, AppError> {
    let controller = ReferenceController::new(&state);
    Ok(Json(controller.list(&resource, query).await?))
}

async fn create_entity(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Json(data): Json<Value>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let controller = ReferenceController::new(&state);
    Ok(Json(controller.create(&resource, data).await?))
}

async fn update_entity(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, i64)>,
    Json(data): Json<Value>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let controller = ReferenceController::new(&state);
    Ok(Json(controller.update(&resource, id, data).await?))
}

async fn delete_entity(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, i64)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ReferenceController::new(&state);
    Ok(Json(controller.delete(&resource, id).await?))
}

async fn search_vehicles(
    State(state): State<AppState>,
    Query(query): Query<VehicleSearchQuery>,
) -> Result<Json<Vec<VehicleOption>>, AppError> {
    let controller = ReferenceController::new(&state);
    Ok(Json(controller.search_vehicles(&query.q).await?))
}
