//! DTOs de la API del gateway

pub mod api_response;
pub mod draft_dto;
pub mod reference_dto;
pub mod settings_dto;

pub use api_response::ApiResponse;
