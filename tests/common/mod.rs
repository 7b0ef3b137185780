//! Utilidades compartidas de los tests de integración

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::Notify;
use tower::ServiceExt;

use freight_backoffice::build_app;
use freight_backoffice::clients::{OrderGateway, ServiceReply, TempFileUpload};
use freight_backoffice::config::EnvironmentConfig;
use freight_backoffice::state::AppState;
use freight_backoffice::utils::errors::{AppError, AppResult};

/// Servicio de pedidos simulado: listados fijos, respuestas en cola y
/// registro de todo lo enviado
#[derive(Default)]
pub struct StubGateway {
    listings: Mutex<HashMap<String, Value>>,
    replies: Mutex<VecDeque<ServiceReply>>,
    pub gets: Mutex<Vec<(String, Vec<(String, String)>)>>,
    pub posts: Mutex<Vec<Value>>,
    pub puts: Mutex<Vec<Value>>,
    pub deletes: Mutex<Vec<Value>>,
    pub uploads: Mutex<Vec<TempFileUpload>>,
    /// Con valor, cada POST espera a `notify_one` antes de responder
    post_gate: Option<Arc<Notify>>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
            .with_listing(
                "vehicles",
                json!({ "vehicles": [
                    { "id": 1, "license_plate": "AB1234-5", "vehicle_brand": "Volvo", "driver_id": 10 },
                    { "id": 2, "license_plate": "KE777", "vehicle_brand": "MAN", "driver_id": null }
                ]}),
            )
            .with_listing(
                "drivers",
                json!({ "drivers": [{
                    "id": 10,
                    "last_name": "Петров",
                    "first_name": "Пётр",
                    "phone": "+375291112233",
                    "additional_phone": "+375447778899"
                }]}),
            )
            .with_listing("last_order_number", json!({ "next_number": "007" }))
    }

    pub fn with_listing(self, resource: &str, body: Value) -> Self {
        self.listings.lock().unwrap().insert(resource.to_string(), body);
        self
    }

    pub fn with_reply(self, reply: ServiceReply) -> Self {
        self.push_reply(reply);
        self
    }

    pub fn with_held_posts(mut self, gate: Arc<Notify>) -> Self {
        self.post_gate = Some(gate);
        self
    }

    pub fn push_reply(&self, reply: ServiceReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn posts(&self) -> Vec<Value> {
        self.posts.lock().unwrap().clone()
    }

    pub fn get_count(&self, resource: &str) -> usize {
        self.gets
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| r == resource)
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
    async fn fetch_resource(&self, resource: &str, params: &[(&str, String)]) -> AppResult<Value> {
        self.gets.lock().unwrap().push((
            resource.to_string(),
            params.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        ));
        self.listings
            .lock()
            .unwrap()
            .get(resource)
            .cloned()
            .ok_or_else(|| AppError::Service(format!("HTTP 404 {}", resource)))
    }

    async fn post_action(&self, body: Value) -> AppResult<ServiceReply> {
        self.posts.lock().unwrap().push(body);
        if let Some(gate) = &self.post_gate {
            gate.notified().await;
        }
        Ok(self.next_reply())
    }

    async fn put_resource(&self, body: Value) -> AppResult<ServiceReply> {
        self.puts.lock().unwrap().push(body);
        Ok(self.next_reply())
    }

    async fn delete_resource(&self, body: Value) -> AppResult<ServiceReply> {
        self.deletes.lock().unwrap().push(body);
        Ok(self.next_reply())
    }

    async fn upload_temp_file(&self, upload: &TempFileUpload) -> AppResult<ServiceReply> {
        self.uploads.lock().unwrap().push(upload.clone());
        Ok(self.next_reply())
    }
}

pub fn test_config() -> EnvironmentConfig {
    EnvironmentConfig::from_lookup(|key| match key {
        "ORDER_API_URL" => Some("http://orders.test/api".to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn create_test_app(gateway: Arc<StubGateway>) -> Router {
    build_app(AppState::new(test_config(), gateway))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    send_with_headers(app, method, uri, body, &[]).await
}

pub async fn send_with_headers(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    TestResponse { status, body }
}

/// Multipart mínimo con un campo de archivo por entrada
pub async fn send_files(app: &Router, uri: &str, files: &[(&str, &str, &[u8])]) -> TestResponse {
    let boundary = "freight-test-boundary";
    let mut body = Vec::new();
    for (name, content_type, content) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                boundary, name, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={}", boundary))
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    }
}

/// Abre un borrador nuevo y devuelve su id
pub async fn open_draft(app: &Router) -> String {
    let response = send(app, Method::POST, "/api/drafts", Some(json!({ "direction": "EU" }))).await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    response.body["data"]["id"].as_str().unwrap().to_string()
}

/// Espera (con límite) a que el servicio simulado reciba `count` POST
pub async fn wait_for_posts(gateway: &StubGateway, count: usize) {
    for _ in 0..200 {
        if gateway.posts().len() >= count {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("el servicio no recibió {} POST", count);
}
