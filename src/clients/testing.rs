//! Gateway en memoria para los tests de servicios

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::clients::{OrderGateway, ServiceReply, TempFileUpload};
use crate::utils::errors::{AppError, AppResult};

/// Llamada registrada: método + cuerpo (o `resource?params` en los GET)
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Get(String),
    Post(Value),
    Put(Value),
    Delete(Value),
    Upload(String),
}

#[derive(Default)]
pub struct StubGateway {
    pub listings: Mutex<HashMap<String, Value>>,
    pub replies: Mutex<VecDeque<ServiceReply>>,
    pub calls: Mutex<Vec<RecordedCall>>,
}

impl StubGateway {
    pub fn with_listing(self, resource: &str, body: Value) -> Self {
        self.listings.lock().unwrap().insert(resource.to_string(), body);
        self
    }

    pub fn with_reply(self, reply: ServiceReply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn get_count(&self, resource: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Get(r) if r == resource))
            .count()
    }

    fn next_reply(&self) -> ServiceReply {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ServiceReply::ok(json!({ "success": true })))
    }
}

#[async_trait]
impl OrderGateway for StubGateway {
    async fn fetch_resource(&self, resource: &str, _params: &[(&str, String)]) -> AppResult<Value> {
        self.calls.lock().unwrap().push(RecordedCall::Get(resource.to_string()));
        self.listings
            .lock()
            .unwrap()
            .get(resource)
            .cloned()
            .ok_or_else(|| AppError::Service(format!("HTTP 404 {}", resource)))
    }

    async fn post_action(&self, body: Value) -> AppResult<ServiceReply> {
        self.calls.lock().unwrap().push(RecordedCall::Post(body));
        Ok(self.next_reply())
    }

    async fn put_resource(&self, body: Value) -> AppResult<ServiceReply> {
        self.calls.lock().unwrap().push(RecordedCall::Put(body));
        Ok(self.next_reply())
    }

    async fn delete_resource(&self, body: Value) -> AppResult<ServiceReply> {
        self.calls.lock().unwrap().push(RecordedCall::Delete(body));
        Ok(self.next_reply())
    }

    async fn upload_temp_file(&self, upload: &TempFileUpload) -> AppResult<ServiceReply> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall::Upload(upload.filename.clone()));
        Ok(self.next_reply())
    }
}
