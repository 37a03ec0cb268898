/// Shared test helper functions for creating test objects across the test suite
///
/// Builders follow the record hierarchy: Crops → Fields → Operations
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Extract response body as JSON for testing
pub async fn extract_response_body(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| json!({"error": "Invalid JSON response"}))
    };
    (status, body)
}

/// Send a request with an optional JSON body and read back the JSON answer
pub async fn send_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    extract_response_body(response).await
}

/// Create a crop through the API and return its JSON
pub async fn create_test_crop(
    app: &axum::Router,
    id: &str,
    name: &str,
    target_yield: f64,
    value: f64,
) -> Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/crops",
        Some(json!({
            "id": id,
            "name": name,
            "sowing": "Autumn",
            "targetYield": target_yield,
            "value": value
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create crop: {body:?}");
    body
}

/// A complete, valid field form
pub fn field_form(name: &str, area: f64, crop: Option<&str>) -> Value {
    json!({
        "name": name,
        "area": area,
        "pH": 6.5,
        "SOM": 3.1,
        "soilType": "Clay loam",
        "risk": "Low",
        "irrigation": "None",
        "drainage": "Good",
        "sowingDate": "2024-10-01",
        "notes": "Created by test helper",
        "crop": crop.unwrap_or("")
    })
}

/// Create a field through the API and return its JSON
pub async fn create_test_field(app: &axum::Router, name: &str, area: f64, crop: Option<&str>) -> Value {
    let (status, body) =
        send_json(app, "POST", "/api/fields", Some(field_form(name, area, crop))).await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create field: {body:?}");
    body
}

/// Record an operation on a field through the API and return its JSON
pub async fn create_test_operation(
    app: &axum::Router,
    field_id: &str,
    date: &str,
    operation: &str,
) -> Value {
    let (status, body) = send_json(
        app,
        "POST",
        &format!("/api/fields/{field_id}/operations"),
        Some(json!({
            "date": date,
            "operation": operation,
            "detail": "Test product",
            "rate": "1 l/ha"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create operation: {body:?}");
    body
}
