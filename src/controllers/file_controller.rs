use crate::dto::api_response::ApiResponse;
use crate::dto::settings_dto::TempFileResult;
use crate::services::{TempFileService, UploadedFile};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::messages;

pub struct FileController {
    service: TempFileService,
}

impl FileController {
    pub fn new(state: &AppState) -> Self {
        Self {
            service: TempFileService::new(state.gateway.clone()),
        }
    }

    /// Sube los archivos uno a uno; la respuesta trae el resultado de cada uno
    pub async fn upload(&self, files: Vec<UploadedFile>) -> Result<ApiResponse<Vec<TempFileResult>>, AppError> {
        let results = self.service.upload_all(files).await;
        let uploaded = results.iter().filter(|r| r.success).count();
        tracing::info!("📁 Archivos temporales subidos: {}/{}", uploaded, results.len());
        Ok(ApiResponse::success_with_message(results, messages::FILES_ADDED))
    }
}
