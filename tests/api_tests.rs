mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::Router;
use chrono::Local;
use freight_backoffice::clients::ServiceReply;
use serde_json::{json, Value};
use tokio::sync::Notify;

use common::{
    create_test_app, open_draft, send, send_files, send_with_headers, wait_for_posts, StubGateway,
};

async fn put_field(app: &Router, uri: &str, field: &str, value: Value) -> Value {
    let response = send(app, Method::PUT, uri, Some(json!({ "field": field, "value": value }))).await;
    assert_eq!(response.status, StatusCode::OK, "{} {}", uri, response.body);
    response.body["data"].clone()
}

/// Borrador con cabecera, cliente y una etapa completa; devuelve (draft_id, stage_id)
async fn complete_draft(app: &Router) -> (String, String) {
    let id = open_draft(app).await;
    let header = format!("/api/drafts/{}/header", id);
    put_field(app, &header, "cargo_type", json!("Тент")).await;
    put_field(app, &header, "cargo_weight", json!(20)).await;
    put_field(app, &header, "invoice", json!("INV-1")).await;
    put_field(app, &header, "track_number", json!("TR-1")).await;
    put_field(app, &format!("/api/drafts/{}/customers/0", id), "customer_id", json!("5")).await;

    let created = send(app, Method::POST, &format!("/api/drafts/{}/stages", id), None).await;
    let stage_id = created.body["data"]["item_id"].as_str().unwrap().to_string();
    let stage = format!("/api/drafts/{}/stages/{}", id, stage_id);
    put_field(app, &stage, "from_location", json!("Минск")).await;
    put_field(app, &stage, "to_location", json!("Москва")).await;
    put_field(app, &stage, "planned_departure", json!("17122024")).await;
    put_field(app, &stage, "vehicle_id", json!(1)).await;

    (id, stage_id)
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(Arc::new(StubGateway::new()));
    let response = send(&app, Method::GET, "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["open_drafts"], 0);
}

#[tokio::test]
async fn test_open_draft_uses_suggested_number() {
    let gateway = Arc::new(StubGateway::new());
    let app = create_test_app(gateway.clone());

    let response = send(&app, Method::POST, "/api/drafts", Some(json!({ "direction": "RF" }))).await;
    assert_eq!(response.status, StatusCode::OK);

    let today = Local::now().date_naive();
    let draft = &response.body["data"];
    assert_eq!(draft["state"], "open");
    assert_eq!(
        draft["header"]["order_number"],
        format!("RF{}-007", today.format("%d%m%Y"))
    );
    assert_eq!(draft["header"]["order_date"], today.format("%Y-%m-%d").to_string());
    assert_eq!(draft["customer_items"].as_array().unwrap().len(), 1);
    assert!(draft["stages"].as_array().unwrap().is_empty());

    let gets = gateway.gets.lock().unwrap().clone();
    let (_, params) = gets.iter().find(|(r, _)| r == "last_order_number").unwrap();
    assert!(params.contains(&("direction".to_string(), "RF".to_string())));
}

#[tokio::test]
async fn test_number_falls_back_when_service_fails() {
    let gateway = Arc::new(StubGateway::default());
    let app = create_test_app(gateway);

    let response = send(&app, Method::POST, "/api/drafts", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let number = response.body["data"]["header"]["order_number"].as_str().unwrap();
    assert!(number.starts_with("EU"));
    assert!(number.ends_with("-001"));
}

#[tokio::test]
async fn test_vehicle_selection_derives_driver() {
    let app = create_test_app(Arc::new(StubGateway::new()));
    let (id, stage_id) = complete_draft(&app).await;
    let stage_uri = format!("/api/drafts/{}/stages/{}", id, stage_id);

    let draft = send(&app, Method::GET, &format!("/api/drafts/{}", id), None).await.body;
    let stage = &draft["stages"][0];
    assert_eq!(stage["driver_id"], 10);
    assert_eq!(stage["driver_phone"], "+375291112233");
    assert_eq!(stage["driver_additional_phone"], "+375447778899");
    assert_eq!(stage["planned_departure"], "17-12-2024");

    let draft = put_field(&app, &stage_uri, "vehicle_id", json!(2)).await;
    let stage = &draft["stages"][0];
    assert_eq!(stage["vehicle_id"], 2);
    assert_eq!(stage["driver_id"], Value::Null);
    assert_eq!(stage["driver_phone"], "");
    assert_eq!(draft["errors"]["stage_0_driver"], "Выберите автомобиль с назначенным водителем");

    let response = send(
        &app,
        Method::PUT,
        &stage_uri,
        Some(json!({ "field": "vehicle_id", "value": "42" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_route_follows_waypoint_order() {
    let app = create_test_app(Arc::new(StubGateway::new()));
    let id = open_draft(&app).await;

    let created = send(&app, Method::POST, &format!("/api/drafts/{}/stages", id), None).await;
    let stage_id = created.body["data"]["item_id"].as_str().unwrap().to_string();
    let stage = format!("/api/drafts/{}/stages/{}", id, stage_id);
    put_field(&app, &stage, "from_location", json!("A")).await;
    put_field(&app, &stage, "to_location", json!("C")).await;

    for location in ["B", "X"] {
        let created = send(&app, Method::POST, &format!("{}/waypoints", stage), None).await;
        let waypoint_id = created.body["data"]["item_id"].as_str().unwrap().to_string();
        put_field(&app, &format!("{}/waypoints/{}", stage, waypoint_id), "location", json!(location)).await;
    }

    let draft = send(&app, Method::GET, &format!("/api/drafts/{}", id), None).await.body;
    assert_eq!(draft["route"], "A → B → X → C");
}

#[tokio::test]
async fn test_removing_stage_renumbers() {
    let app = create_test_app(Arc::new(StubGateway::new()));
    let id = open_draft(&app).await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let created = send(&app, Method::POST, &format!("/api/drafts/{}/stages", id), None).await;
        ids.push(created.body["data"]["item_id"].as_str().unwrap().to_string());
    }

    let response = send(&app, Method::DELETE, &format!("/api/drafts/{}/stages/{}", id, ids[0]), None).await;
    assert_eq!(response.status, StatusCode::OK);

    let stages = response.body["data"]["stages"].as_array().unwrap().clone();
    let numbers: Vec<u64> = stages.iter().map(|s| s["stage_number"].as_u64().unwrap()).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(stages[0]["id"], ids[1]);
}

#[tokio::test]
async fn test_last_customer_item_cannot_be_removed() {
    let app = create_test_app(Arc::new(StubGateway::new()));
    let id = open_draft(&app).await;

    let response = send(&app, Method::DELETE, &format!("/api/drafts/{}/customers/0", id), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Должен быть минимум 1 заказчик");
}

#[tokio::test]
async fn test_submit_without_customer_is_blocked() {
    let gateway = Arc::new(StubGateway::new());
    let app = create_test_app(gateway.clone());
    let id = open_draft(&app).await;

    let response = send(
        &app,
        Method::POST,
        &format!("/api/drafts/{}/submit", id),
        Some(json!({ "confirm_without_route": true })),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["code"], "DRAFT_INVALID");
    assert_eq!(
        response.body["details"]["fields"]["customer_items"],
        "Добавьте хотя бы одного заказчика"
    );
    assert!(gateway.posts().is_empty());
}

#[tokio::test]
async fn test_submit_without_stages_suggests_route() {
    let gateway = Arc::new(StubGateway::new());
    let app = create_test_app(gateway.clone());
    let (id, stage_id) = complete_draft(&app).await;
    send(&app, Method::DELETE, &format!("/api/drafts/{}/stages/{}", id, stage_id), None).await;

    let response = send(&app, Method::POST, &format!("/api/drafts/{}/submit", id), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "route_suggested");
    assert!(gateway.posts().is_empty());

    let response = send(
        &app,
        Method::POST,
        &format!("/api/drafts/{}/submit", id),
        Some(json!({ "confirm_without_route": true })),
    )
    .await;
    assert_eq!(response.body["data"]["status"], "created");
    assert_eq!(gateway.posts()[0]["data"]["stages"], json!([]));
}

#[tokio::test]
async fn test_submit_creates_order_and_closes_draft() {
    let gateway = Arc::new(StubGateway::new().with_reply(ServiceReply::ok(json!({
        "success": true,
        "order_id": 321
    }))));
    let app = create_test_app(gateway.clone());
    let (id, _) = complete_draft(&app).await;

    let response = send_with_headers(
        &app,
        Method::POST,
        &format!("/api/drafts/{}/submit", id),
        None,
        &[("x-user-role", "%D0%9B%D0%BE%D0%B3%D0%B8%D1%81%D1%82"), ("x-user-name", "anna")],
    )
    .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["data"]["status"], "created");
    assert_eq!(response.body["data"]["order_id"], 321);
    assert_eq!(response.body["message"], "Заказ создан");

    let posted = &gateway.posts()[0];
    assert_eq!(posted["action"], "create_multi_stage_order");
    assert_eq!(posted["user_role"], "Логист");
    assert_eq!(posted["user_name"], "anna");
    assert_eq!(posted["data"]["order"]["status"], "pending");
    assert_eq!(posted["data"]["order"]["cargo_weight"], "20");
    assert_eq!(posted["data"]["stages"][0]["planned_departure"], "2024-12-17");
    assert_eq!(posted["data"]["stages"][0]["driver_id"], 10);

    let response = send(&app, Method::GET, &format!("/api/drafts/{}", id), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_failed_submit_keeps_draft_open() {
    let gateway = Arc::new(StubGateway::new().with_reply(ServiceReply {
        status: 409,
        body: json!({ "error": "Заказ с таким номером уже существует" }),
    }));
    let app = create_test_app(gateway.clone());
    let (id, _) = complete_draft(&app).await;

    let response = send(&app, Method::POST, &format!("/api/drafts/{}/submit", id), None).await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["message"], "Заказ с таким номером уже существует");

    let draft = send(&app, Method::GET, &format!("/api/drafts/{}", id), None).await.body;
    assert_eq!(draft["state"], "open");
    assert_eq!(draft["header"]["invoice"], "INV-1");

    let response = send(&app, Method::POST, &format!("/api/drafts/{}/submit", id), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(gateway.posts().len(), 2);
}

#[tokio::test]
async fn test_success_flag_is_required() {
    let gateway = Arc::new(StubGateway::new().with_reply(ServiceReply::ok(json!({ "order_id": 9 }))));
    let app = create_test_app(gateway);
    let (id, _) = complete_draft(&app).await;

    let response = send(&app, Method::POST, &format!("/api/drafts/{}/submit", id), None).await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["message"], "Ошибка при создании заказа");
}

#[tokio::test]
async fn test_edit_existing_order() {
    let gateway = Arc::new(StubGateway::new());
    let app = create_test_app(gateway.clone());

    let response = send(
        &app,
        Method::POST,
        "/api/drafts/edit",
        Some(json!({
            "id": 77,
            "order_number": "CH01022025-003",
            "order_date": "2025-02-01T00:00:00",
            "cargo_type": "Реф",
            "cargo_weight": 12,
            "invoice": "INV-77",
            "track_number": "TR-77",
            "customer_items": [{ "customer_id": 4, "note": "7 тонн" }],
            "stages": [{
                "id": 501,
                "from_location": "Брест",
                "to_location": "Варшава",
                "planned_departure": "2025-02-03",
                "vehicle_id": 1,
                "driver_id": 10,
                "waypoints": [],
                "customs_points": []
            }]
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);

    let draft = &response.body["data"];
    let id = draft["id"].as_str().unwrap().to_string();
    assert_eq!(draft["direction"], "CH");
    assert_eq!(draft["stages"][0]["id"], "existing_501");
    assert_eq!(draft["stages"][0]["planned_departure"], "03-02-2025");
    assert_eq!(draft["stages"][0]["driver_phone"], "+375291112233");

    let response = send(
        &app,
        Method::PUT,
        &format!("/api/drafts/{}/header", id),
        Some(json!({ "field": "invoice", "value": "X" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    put_field(&app, &format!("/api/drafts/{}/header", id), "notes", json!("срочно")).await;

    let response = send(&app, Method::POST, &format!("/api/drafts/{}/submit", id), None).await;
    assert_eq!(response.body["data"]["status"], "updated");
    assert_eq!(response.body["data"]["order_id"], 77);

    let posted = &gateway.posts()[0];
    assert_eq!(posted["action"], "update_order");
    assert_eq!(posted["order_id"], 77);
    assert_eq!(posted["order"]["notes"], "срочно");
    assert!(posted["order"].get("status").is_none());
}

#[tokio::test]
async fn test_edit_order_with_missing_header_fields() {
    let gateway = Arc::new(StubGateway::new());
    let app = create_test_app(gateway.clone());

    let response = send(
        &app,
        Method::POST,
        "/api/drafts/edit",
        Some(json!({
            "id": 9,
            "order_number": "EU05012024-001",
            "order_date": "2024-01-05",
            "customer_items": [{ "customer_id": 4 }]
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    let id = response.body["data"]["id"].as_str().unwrap().to_string();
    let header_uri = format!("/api/drafts/{}/header", id);

    let response = send(
        &app,
        Method::PUT,
        &header_uri,
        Some(json!({ "field": "order_number", "value": "EU05012024-002" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    for (field, value) in [
        ("invoice", "INV-9"),
        ("track_number", "TR-9"),
        ("cargo_type", "Тент"),
        ("cargo_weight", "800"),
    ] {
        put_field(&app, &header_uri, field, json!(value)).await;
    }

    let response = send(
        &app,
        Method::POST,
        &format!("/api/drafts/{}/submit", id),
        Some(json!({ "confirm_without_route": true })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["data"]["status"], "updated");

    let posted = &gateway.posts()[0];
    assert_eq!(posted["action"], "update_order");
    assert_eq!(posted["order"]["invoice"], "INV-9");
    assert_eq!(posted["order"]["track_number"], "TR-9");
}

#[tokio::test]
async fn test_attachments_only_on_new_orders() {
    let app = create_test_app(Arc::new(StubGateway::new()));
    let id = open_draft(&app).await;

    let response = send_files(
        &app,
        &format!("/api/drafts/{}/attachments", id),
        &[("cmr.pdf", "application/pdf", b"%PDF-1.4"), ("photo.jpg", "image/jpeg", b"jpg")],
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);

    let attachments = response.body["data"]["attachments"].as_array().unwrap().clone();
    assert_eq!(attachments.len(), 2);
    assert_eq!(attachments[0]["name"], "cmr.pdf");
    assert_eq!(attachments[0]["type"], "application/pdf");
    assert!(attachments[0]["data"]
        .as_str()
        .unwrap()
        .starts_with("data:application/pdf;base64,"));

    let response = send(&app, Method::DELETE, &format!("/api/drafts/{}/attachments/0", id), None).await;
    assert_eq!(response.body["data"]["attachments"][0]["name"], "photo.jpg");
}

#[tokio::test]
async fn test_closing_draft_discards_it() {
    let app = create_test_app(Arc::new(StubGateway::new()));
    let id = open_draft(&app).await;

    let response = send(&app, Method::DELETE, &format!("/api/drafts/{}", id), None).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = send(&app, Method::GET, &format!("/api/drafts/{}", id), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reference_listing_is_cached_and_invalidated() {
    let gateway = Arc::new(StubGateway::new());
    let app = create_test_app(gateway.clone());

    for _ in 0..2 {
        let response = send(&app, Method::GET, "/api/resources/drivers", None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["drivers"][0]["id"], 10);
    }
    assert_eq!(gateway.get_count("drivers"), 1);

    let response = send(
        &app,
        Method::PUT,
        "/api/resources/drivers/10",
        Some(json!({
            "last_name": "Петров",
            "first_name": "Пётр",
            "phone": "375 29 111-22-33",
            "passport_series": "MP",
            "passport_number": "1234567",
            "passport_issued_by": "РУВД",
            "passport_issue_date": "01-01-2020",
            "license_series": "AB",
            "license_number": "765432",
            "license_issued_by": "ГАИ",
            "license_issue_date": "02-02-2021"
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);

    let put = gateway.puts.lock().unwrap()[0].clone();
    assert_eq!(put["resource"], "driver");
    assert_eq!(put["data"]["phone"], "+375291112233");

    send(&app, Method::GET, "/api/resources/drivers", None).await;
    assert_eq!(gateway.get_count("drivers"), 2);
}

#[tokio::test]
async fn test_reference_validation_and_unknown_resource() {
    let app = create_test_app(Arc::new(StubGateway::new()));

    let response = send(&app, Method::POST, "/api/resources/clients", Some(json!({ "name": "" }))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "VALIDATION_ERROR");
    assert_eq!(response.body["details"]["fields"]["phone"], "Обязательное поле");

    let response = send(&app, Method::GET, "/api/resources/trucks", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_vehicle_search() {
    let app = create_test_app(Arc::new(StubGateway::new()));
    let response = send(&app, Method::GET, "/api/vehicles/search?q=man", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([{ "id": 2, "display_text": "MAN KE777", "driver_id": null }]));
}

#[tokio::test]
async fn test_delete_order_forwards_actor() {
    let gateway = Arc::new(StubGateway::new());
    let app = create_test_app(gateway.clone());

    let response = send_with_headers(&app, Method::DELETE, "/api/orders/15", None, &[("x-user-name", "ivan")]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        gateway.posts()[0],
        json!({
            "action": "delete_order",
            "order_id": 15,
            "user_role": "Пользователь",
            "user_name": "ivan"
        })
    );
}

#[tokio::test]
async fn test_telegram_test_requires_credentials() {
    let gateway = Arc::new(StubGateway::new());
    let app = create_test_app(gateway.clone());

    let response = send(
        &app,
        Method::POST,
        "/api/settings/telegram/test",
        Some(json!({ "bot_token": "123:abc", "chat_id": "" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Укажите токен бота и Chat ID");
    assert!(gateway.posts().is_empty());
}

#[tokio::test]
async fn test_temp_files_upload_independently() {
    let gateway = Arc::new(
        StubGateway::new()
            .with_reply(ServiceReply::ok(json!({ "success": true, "url": "https://cdn.test/temp/a.txt" })))
            .with_reply(ServiceReply { status: 500, body: Value::Null }),
    );
    let app = create_test_app(gateway.clone());

    let response = send_files(
        &app,
        "/api/temp-files",
        &[("a.txt", "text/plain", b"hello"), ("b.txt", "text/plain", b"world")],
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);

    let results = response.body["data"].as_array().unwrap().clone();
    assert_eq!(results[0]["success"], true);
    assert_eq!(results[0]["file"]["url"], "https://cdn.test/temp/a.txt");
    assert_eq!(results[1]["success"], false);
    assert_eq!(results[1]["error"], "Не удалось загрузить файл");

    let uploads = gateway.uploads.lock().unwrap().clone();
    assert_eq!(uploads[0].content, "aGVsbG8=");
}

#[tokio::test]
async fn test_draft_can_be_closed_while_submit_is_pending() {
    let gate = Arc::new(Notify::new());
    let gateway = Arc::new(StubGateway::new().with_held_posts(gate.clone()));
    let app = create_test_app(gateway.clone());
    let (id, _) = complete_draft(&app).await;

    let submit = tokio::spawn({
        let app = app.clone();
        let uri = format!("/api/drafts/{}/submit", id);
        async move { send(&app, Method::POST, &uri, None).await }
    });
    wait_for_posts(&gateway, 1).await;

    let response = send(&app, Method::DELETE, &format!("/api/drafts/{}", id), None).await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);

    gate.notify_one();
    let response = submit.await.unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let health = send(&app, Method::GET, "/health", None).await;
    assert_eq!(health.body["open_drafts"], 0);
}

#[tokio::test]
async fn test_abandoned_submit_request_still_reopens_draft() {
    let gate = Arc::new(Notify::new());
    let gateway = Arc::new(
        StubGateway::new()
            .with_reply(ServiceReply {
                status: 500,
                body: json!({ "error": "База недоступна" }),
            })
            .with_held_posts(gate.clone()),
    );
    let app = create_test_app(gateway.clone());
    let (id, _) = complete_draft(&app).await;
    let header = format!("/api/drafts/{}/header", id);

    // el cliente se desconecta mientras espera al servicio
    let submit = tokio::spawn({
        let app = app.clone();
        let uri = format!("/api/drafts/{}/submit", id);
        async move { send(&app, Method::POST, &uri, None).await }
    });
    wait_for_posts(&gateway, 1).await;
    submit.abort();

    let response = send(&app, Method::PUT, &header, Some(json!({ "field": "notes", "value": "x" }))).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    gate.notify_one();
    let mut status = StatusCode::CONFLICT;
    for _ in 0..200 {
        let response = send(&app, Method::PUT, &header, Some(json!({ "field": "notes", "value": "x" }))).await;
        status = response.status;
        if status != StatusCode::CONFLICT {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert_eq!(status, StatusCode::OK);

    let response = send(&app, Method::GET, &format!("/api/drafts/{}", id), None).await;
    assert_eq!(response.body["state"], "open");
}

#[tokio::test]
async fn test_uploads_larger_than_two_megabytes() {
    let gateway = Arc::new(StubGateway::new());
    let app = create_test_app(gateway.clone());
    let id = open_draft(&app).await;
    let scan = vec![b'%'; 3 * 1024 * 1024];

    let response = send_files(
        &app,
        &format!("/api/drafts/{}/attachments", id),
        &[("scan.pdf", "application/pdf", scan.as_slice())],
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["data"]["attachments"][0]["size"], 3 * 1024 * 1024);

    let response = send_files(&app, "/api/temp-files", &[("scan.pdf", "application/pdf", scan.as_slice())]).await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["data"][0]["success"], true);
    assert_eq!(gateway.uploads.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_listing_params_share_the_cache_entry() {
    let gateway = Arc::new(StubGateway::new().with_listing("order_stages", json!({ "stages": [] })));
    let app = create_test_app(gateway.clone());

    for n in 0..5 {
        let uri = format!("/api/resources/drivers?page={}", n);
        let response = send(&app, Method::GET, &uri, None).await;
        assert_eq!(response.status, StatusCode::OK);
    }
    assert_eq!(gateway.get_count("drivers"), 1);

    send(&app, Method::GET, "/api/resources/order_stages?order_id=5&x=1", None).await;
    let forwarded = gateway.gets.lock().unwrap().last().cloned().unwrap();
    assert_eq!(forwarded.1, vec![("order_id".to_string(), "5".to_string())]);

    let health = send(&app, Method::GET, "/health", None).await;
    assert_eq!(health.body["reference_cache"]["entries"], 2);
}
