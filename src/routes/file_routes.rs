use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};

use crate::controllers::file_controller::FileController;
use crate::dto::api_response::ApiResponse;
use crate::dto::settings_dto::TempFileResult;
use crate::services::read_files;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_temp_file_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().route(
        "/",
        post(upload_temp_files).layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}

async fn upload_temp_files(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Vec<TempFileResult>>>, AppError> {
    let files = read_files(multipart).await?;
    let controller = FileController::new(&state);
    Ok(Json(controller.upload(files).await?))
}
