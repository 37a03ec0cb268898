use crate::config::test_helpers::{setup_test_app, setup_test_app_with_db};
use crate::operations::models as operations;
use crate::operations::services::today;
use crate::test_helpers::{create_test_field, create_test_operation, send_json};
use axum::http::StatusCode;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{Value, json};

#[tokio::test]
async fn test_new_operation_form_preselects_field() {
    let app = setup_test_app().await;
    let home = create_test_field(&app, "Home", 2.0, None).await;
    create_test_field(&app, "Away", 3.0, None).await;
    let home_id = home["id"].as_str().unwrap();

    let (status, body) =
        send_json(&app, "GET", &format!("/api/fields/{home_id}/operations/new"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "New Operation");
    assert_eq!(body["values"]["field"], home_id);
    assert_eq!(body["values"]["date"], today().format("%Y-%m-%d").to_string());
    assert_eq!(body["field"]["name"], "Home");

    let labels: Vec<&str> = body["field_options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Away", "Home"]);
}

#[tokio::test]
async fn test_operation_create_and_read_back() {
    let app = setup_test_app().await;
    let field = create_test_field(&app, "Home", 2.0, None).await;
    let field_id = field["id"].as_str().unwrap();

    let created = create_test_operation(&app, field_id, "2025-03-14", "Spraying").await;
    let id = created["id"].as_str().unwrap();
    assert!(id.starts_with("OP-") && id.len() == 11, "Unexpected id {id}");
    assert_eq!(created["field"], field_id);
    assert_eq!(created["date"], "2025-03-14");
    assert_eq!(created["detail"], "Test product");

    let (status, body) = send_json(&app, "GET", &format!("/api/operations/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
}

#[tokio::test]
async fn test_route_field_overrides_submitted_field() {
    let app = setup_test_app().await;
    let home = create_test_field(&app, "Home", 2.0, None).await;
    let away = create_test_field(&app, "Away", 3.0, None).await;
    let home_id = home["id"].as_str().unwrap();

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/fields/{home_id}/operations"),
        Some(json!({
            "date": "2025-05-01",
            "operation": "Harrowing",
            "field": away["id"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["field"], home_id);
}

#[tokio::test]
async fn test_route_field_wins_over_non_text_field() {
    let app = setup_test_app().await;
    let home = create_test_field(&app, "Home", 2.0, None).await;
    let home_id = home["id"].as_str().unwrap();

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/fields/{home_id}/operations"),
        Some(json!({"date": "2025-05-01", "operation": "Rolling", "field": 42})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body:?}");
    assert_eq!(body["field"], home_id);
}

#[tokio::test]
async fn test_empty_detail_and_rate_are_kept() {
    let app = setup_test_app().await;
    let field = create_test_field(&app, "Home", 2.0, None).await;
    let field_id = field["id"].as_str().unwrap();

    let (status, created) = send_json(
        &app,
        "POST",
        &format!("/api/fields/{field_id}/operations"),
        Some(json!({"date": "2025-05-02", "operation": "Walking", "detail": "", "rate": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{created:?}");
    assert_eq!(created["detail"], "");
    assert_eq!(created["rate"], "");

    let id = created["id"].as_str().unwrap();
    let (_, body) = send_json(&app, "GET", &format!("/api/operations/{id}"), None).await;
    assert_eq!(body, created);
}

#[tokio::test]
async fn test_missing_date_defaults_to_today() {
    let app = setup_test_app().await;
    let field = create_test_field(&app, "Home", 2.0, None).await;
    let field_id = field["id"].as_str().unwrap();

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/fields/{field_id}/operations"),
        Some(json!({"operation": "Rolling"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["date"], today().format("%Y-%m-%d").to_string());
    assert_eq!(body["detail"], Value::Null);
    assert_eq!(body["rate"], Value::Null);
}

#[tokio::test]
async fn test_operation_validation_failure_creates_nothing() {
    let (app, db) = setup_test_app_with_db().await;
    let field = create_test_field(&app, "Home", 2.0, None).await;
    let field_id = field["id"].as_str().unwrap();

    let input = json!({"date": "", "operation": "  "});
    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/fields/{field_id}/operations"),
        Some(input.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["fields"]["date"][0], "This field is required.");
    assert_eq!(body["error"]["fields"]["operation"][0], "This field is required.");
    assert_eq!(body["error"]["input"], input);

    let count = operations::Entity::find().count(&db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_operations_listed_by_date() {
    let app = setup_test_app().await;
    let field = create_test_field(&app, "Home", 2.0, None).await;
    let field_id = field["id"].as_str().unwrap();

    create_test_operation(&app, field_id, "2025-06-01", "Harvest").await;
    create_test_operation(&app, field_id, "2024-10-01", "Sowing").await;
    create_test_operation(&app, field_id, "2025-03-15", "Spraying").await;

    let (status, body) =
        send_json(&app, "GET", &format!("/api/fields/{field_id}/operations"), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["operation"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Sowing", "Spraying", "Harvest"]);

    let (_, detail) = send_json(&app, "GET", &format!("/api/fields/{field_id}"), None).await;
    assert_eq!(detail["operations"], body);
}

#[tokio::test]
async fn test_operation_delete_points_back_to_field() {
    let app = setup_test_app().await;
    let field = create_test_field(&app, "Home", 2.0, None).await;
    let field_id = field["id"].as_str().unwrap();
    let operation = create_test_operation(&app, field_id, "2025-03-14", "Spraying").await;
    let id = operation["id"].as_str().unwrap();

    let (status, body) = send_json(&app, "DELETE", &format!("/api/operations/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["field_id"], field_id);
    assert_eq!(body["redirect_to"], format!("/api/fields/{field_id}"));

    let (status, _) = send_json(&app, "GET", &format!("/api/operations/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "DELETE", &format!("/api/operations/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_operations_on_unknown_field_are_not_found() {
    let app = setup_test_app().await;

    let (status, _) = send_json(&app, "GET", "/api/fields/C-9999/operations/new", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "GET", "/api/fields/C-9999/operations", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/fields/C-9999/operations",
        Some(json!({"operation": "Sowing"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}
