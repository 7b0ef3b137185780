//! Clients - HTTP Clients for External APIs
//!
//! This module contains the HTTP client for the external order service.

pub mod order_api_client;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for convenience
pub use order_api_client::{OrderApiClient, OrderGateway, ServiceReply, TempFileUpload};
