use super::forms::{OperationForm, OperationFormContext};
use super::models::{Operation, OperationDeleted};
use super::services;
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::forms::bind_form;
use crate::common::state::AppState;
use crate::fields::services::{get_field, list_fields};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use sea_orm::TransactionTrait;
use serde_json::Value;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Operation routes that hang off a field, nested under `/api/fields`
pub fn field_router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_field_operations, create_operation))
        .routes(routes!(new_operation_form))
        .with_state(state.clone())
}

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_operation, delete_operation))
        .with_state(state.clone())
}

#[utoipa::path(
    get,
    path = "/{id}/operations",
    params(
        ("id" = String, Path, description = "Field ID")
    ),
    responses(
        (status = 200, description = "Operations on the field, oldest first", body = Vec<Operation>),
        (status = 404, description = "Field not found")
    ),
    tag = "operations",
    summary = "List field operations"
)]
pub async fn list_field_operations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> BusinessResult<Json<Vec<Operation>>> {
    get_field(&state.db, &id).await?;
    let operations = services::list_operations_for_field(&state.db, &id).await?;
    Ok(Json(operations.into_iter().map(Operation::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}/operations/new",
    params(
        ("id" = String, Path, description = "Field ID")
    ),
    responses(
        (status = 200, description = "Operation form with the field preselected and today's date", body = OperationFormContext),
        (status = 404, description = "Field not found")
    ),
    tag = "operations",
    summary = "New operation form"
)]
pub async fn new_operation_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> BusinessResult<Json<OperationFormContext>> {
    let field = get_field(&state.db, &id).await?;
    let field_options = list_fields(&state.db).await?;
    Ok(Json(OperationFormContext::new_operation(
        field,
        &field_options,
        services::today(),
    )))
}

#[utoipa::path(
    post,
    path = "/{id}/operations",
    params(
        ("id" = String, Path, description = "Field ID; overrides any field in the body")
    ),
    request_body = OperationForm,
    responses(
        (status = 201, description = "Operation recorded under a generated id", body = Operation),
        (status = 404, description = "Field not found"),
        (status = 409, description = "No free operation id could be found"),
        (status = 422, description = "Validation failed; the form is returned with its messages")
    ),
    tag = "operations",
    summary = "Record operation",
    description = "The date defaults to today when it is left out of the body."
)]
pub async fn create_operation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<Value>,
) -> BusinessResult<(StatusCode, Json<Operation>)> {
    let txn = state.db.begin().await.map_err(|e| e.to_business_error("operation"))?;
    get_field(&txn, &id).await?;

    let form: OperationForm = bind_form(&input)?;
    let field_options = list_fields(&txn).await?;
    let bound = form
        .preselect_field(&id)
        .validate(&field_options, services::today(), &input)?;
    let operation =
        services::create_operation(&txn, bound, state.config.id_allocation_attempts).await?;
    txn.commit().await.map_err(|e| e.to_business_error("operation"))?;

    Ok((StatusCode::CREATED, Json(operation.into())))
}

#[utoipa::path(
    get,
    path = "/{id}",
    params(
        ("id" = String, Path, description = "Operation ID, e.g. OP-00012345")
    ),
    responses(
        (status = 200, description = "The operation", body = Operation),
        (status = 404, description = "Operation not found")
    ),
    tag = "operations",
    summary = "Get operation"
)]
pub async fn get_operation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> BusinessResult<Json<Operation>> {
    let operation = services::get_operation(&state.db, &id).await?;
    Ok(Json(operation.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    params(
        ("id" = String, Path, description = "Operation ID")
    ),
    responses(
        (status = 200, description = "Operation deleted; points back to its field", body = OperationDeleted),
        (status = 404, description = "Operation not found")
    ),
    tag = "operations",
    summary = "Delete operation"
)]
pub async fn delete_operation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> BusinessResult<Json<OperationDeleted>> {
    let txn = state.db.begin().await.map_err(|e| e.to_business_error("operation"))?;
    let field_id = services::delete_operation(&txn, &id).await?;
    txn.commit().await.map_err(|e| e.to_business_error("operation"))?;

    Ok(Json(OperationDeleted {
        redirect_to: format!("/api/fields/{field_id}"),
        id,
        field_id,
    }))
}
