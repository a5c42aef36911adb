#![allow(dead_code)]

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use procurement_gateway::config::IntakeConfig;
use procurement_gateway::{router, AppState, BackendClient, DocumentIntake};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// 测试用后端桩: 内存列表 + 调用记录
#[derive(Clone, Default)]
pub struct StubBackend {
    pub requests: Arc<Mutex<Vec<Value>>>,
    pub created: Arc<Mutex<Vec<Value>>>,
    pub deleted: Arc<Mutex<Vec<String>>>,
    pub document_calls: Arc<AtomicUsize>,
}

impl StubBackend {
    pub fn with_samples() -> Self {
        let stub = Self::default();
        *stub.requests.lock().unwrap() = sample_requests();
        stub
    }

    pub fn document_calls(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<Value> {
        self.created.lock().unwrap().clone()
    }
}

pub fn sample_requests() -> Vec<Value> {
    vec![
        json!({
            "_id": "r1",
            "requestor_name": "Jane Doe",
            "title": "Laptops",
            "vendor_name": "Acme GmbH",
            "vat_id": "DE111111111",
            "commodity_group": "Hardware",
            "order_lines": [
                {"description": "Laptop", "unit_price": 1000.0, "amount": 2.0, "unit": "pcs", "total_price": 2000.0}
            ],
            "total_cost": 2000.0,
            "department": "IT",
            "status": "OPEN",
            "created_at": "2024-05-01T09:00:00",
            "updated_at": "2024-05-01T09:00:00"
        }),
        json!({
            "_id": "r2",
            "requestor_name": "Max Muster",
            "title": "Office cleaning",
            "vendor_name": "CleanCo",
            "vat_id": "DE222222222",
            "commodity_group": "Cleaning",
            "order_lines": [
                {"description": "Monthly cleaning", "unit_price": 400.0, "amount": 2.0, "unit": "month", "total_price": 800.0}
            ],
            "total_cost": 800.0,
            "department": "Facilities",
            "status": "CLOSED",
            "created_at": "2024-05-03T09:00:00",
            "updated_at": "2024-05-04T09:00:00"
        }),
        json!({
            "_id": "r3",
            "requestor_name": "Erika Beispiel",
            "title": "antivirus licences",
            "vendor_name": "SecureSoft",
            "vat_id": "DE333333333",
            "commodity_group": "Software",
            "order_lines": [
                {"description": "Licence", "unit_price": 30.0, "amount": 10.0, "unit": "seat", "total_price": 300.0}
            ],
            "total_cost": 300.0,
            "department": "IT",
            "status": "OPEN",
            "created_at": "2024-05-02T09:00:00",
            "updated_at": "2024-05-02T09:00:00"
        }),
    ]
}

pub fn extraction_result() -> Value {
    json!({
        "vendor_name": "Acme Office Supplies",
        "vat_id": "DE999999999",
        "department": "Facilities",
        "order_lines": [
            {"description": "Chair", "unit_price": 49.5, "amount": 4, "unit": "pcs", "total_price": 198}
        ],
        "total_cost": 198
    })
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": "Request not found"})),
    )
        .into_response()
}

async fn list(State(stub): State<StubBackend>) -> Json<Value> {
    Json(Value::Array(stub.requests.lock().unwrap().clone()))
}

async fn create(State(stub): State<StubBackend>, Json(body): Json<Value>) -> Json<Value> {
    stub.created.lock().unwrap().push(body.clone());
    let mut record = body;
    record["_id"] = json!("new-1");
    record["status"] = json!("OPEN");
    record["created_at"] = json!("2024-06-01T12:00:00");
    record["updated_at"] = json!("2024-06-01T12:00:00");
    Json(record)
}

async fn set_status(
    State(stub): State<StubBackend>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut requests = stub.requests.lock().unwrap();
    match requests.iter_mut().find(|r| r["_id"] == json!(id)) {
        Some(record) => {
            record["status"] = body["status"].clone();
            Json(record.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn remove(State(stub): State<StubBackend>, Path(id): Path<String>) -> Response {
    match id.as_str() {
        "gone" => (StatusCode::NOT_FOUND, Json(json!({"message": "no such thing"}))).into_response(),
        "exploding" => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response(),
        _ => {
            let mut requests = stub.requests.lock().unwrap();
            let before = requests.len();
            requests.retain(|r| r["_id"] != json!(id));
            if requests.len() == before {
                return not_found();
            }
            stub.deleted.lock().unwrap().push(id);
            Json(json!({"message": "Request deleted successfully"})).into_response()
        }
    }
}

async fn process(State(stub): State<StubBackend>, mut multipart: Multipart) -> Response {
    stub.document_calls.fetch_add(1, Ordering::SeqCst);
    let mut file_name = String::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            file_name = field.file_name().unwrap_or_default().to_string();
            let _ = field.bytes().await;
        }
    }
    if file_name == "garbled.pdf" {
        return (StatusCode::OK, "<html>oops</html>").into_response();
    }
    if file_name == "unreadable.pdf" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Could not extract text from document",
        )
            .into_response();
    }
    Json(extraction_result()).into_response()
}

/// 在随机端口启动后端桩, 返回基础地址
pub async fn spawn_backend(stub: StubBackend) -> String {
    let app = Router::new()
        .route("/api/requests", get(list).post(create))
        .route("/api/requests/:id", delete(remove))
        .route("/api/requests/:id/status", patch(set_status))
        .route("/api/process-document", post(process))
        .route(
            "/docs",
            get(|| async { ([(CONTENT_TYPE, "text/html")], "<html>API docs</html>") }),
        )
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// 一个没有服务监听的地址
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn intake_config() -> IntakeConfig {
    IntakeConfig {
        max_file_size_mb: 10,
        validate_picker_uploads: true,
    }
}

pub fn intake(client: &BackendClient) -> DocumentIntake {
    DocumentIntake::new(client.clone(), &intake_config())
}

pub fn gateway(base_url: &str) -> Router {
    let client = BackendClient::new(base_url).unwrap();
    let intake = intake(&client);
    router(AppState::new(client, intake))
}

pub async fn send_raw(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, request).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn upload_request(file_name: Option<&str>, content: &[u8], origin: Option<&str>) -> Request<Body> {
    let boundary = "gateway-test-boundary";
    let mut body = Vec::new();
    if let Some(origin) = origin {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"origin\"\r\n\r\n{origin}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file_name) = file_name {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/process-document")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn new_request_body() -> Value {
    json!({
        "requestor_name": "Jane Doe",
        "title": "Standing desks",
        "vendor_name": "Desk AG",
        "vat_id": "DE444444444",
        "commodity_group": "Office Equipment",
        "order_lines": [
            {"description": "Desk", "unit_price": 10, "amount": 2, "unit": "pcs", "total_price": 0},
            {"description": "Mat", "unit_price": 5, "amount": 3, "unit": "pcs", "total_price": 15}
        ],
        "total_cost": 0,
        "department": "Facilities"
    })
}
