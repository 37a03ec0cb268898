use super::forms::{FieldForm, FieldFormContext};
use super::models::{Field, FieldDetail};
use super::services;
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::forms::bind_form;
use crate::common::state::AppState;
use crate::crops::models::{self as crops, Crop};
use crate::operations::models::Operation;
use crate::operations::services::list_operations_for_field;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use sea_orm::TransactionTrait;
use serde_json::Value;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(new_field_form))
        .routes(routes!(create_field))
        .routes(routes!(get_field, update_field, delete_field))
        .routes(routes!(edit_field_form))
        .with_state(state.clone())
}

#[utoipa::path(
    get,
    path = "/new",
    responses(
        (status = 200, description = "Blank field form with crop options", body = FieldFormContext)
    ),
    tag = "fields",
    summary = "New field form"
)]
pub async fn new_field_form(State(state): State<AppState>) -> BusinessResult<Json<FieldFormContext>> {
    let crops = crops::list_crops(&state.db).await?;
    Ok(Json(FieldFormContext::new_field(&crops)))
}

#[utoipa::path(
    post,
    path = "/",
    request_body = FieldForm,
    responses(
        (status = 201, description = "Field created under a generated id", body = Field),
        (status = 409, description = "No free field id could be found"),
        (status = 422, description = "Validation failed; the form is returned with its messages")
    ),
    tag = "fields",
    summary = "Create field"
)]
pub async fn create_field(
    State(state): State<AppState>,
    Json(input): Json<Value>,
) -> BusinessResult<(StatusCode, Json<Field>)> {
    let form: FieldForm = bind_form(&input)?;

    let txn = state.db.begin().await.map_err(|e| e.to_business_error("field"))?;
    let crop_options = crops::list_crops(&txn).await?;
    let bound = form.validate(&crop_options, &input)?;
    let field = services::create_field(&txn, bound, state.config.id_allocation_attempts).await?;
    txn.commit().await.map_err(|e| e.to_business_error("field"))?;

    Ok((StatusCode::CREATED, Json(field.into())))
}

#[utoipa::path(
    get,
    path = "/{id}",
    params(
        ("id" = String, Path, description = "Field ID, e.g. C-0042")
    ),
    responses(
        (status = 200, description = "The field with its crop and operations", body = FieldDetail),
        (status = 404, description = "Field not found")
    ),
    tag = "fields",
    summary = "Get field"
)]
pub async fn get_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> BusinessResult<Json<FieldDetail>> {
    let record = services::get_field_with_crop(&state.db, &id).await?;
    let operations = list_operations_for_field(&state.db, &id).await?;

    Ok(Json(FieldDetail {
        title: record.field.name.clone(),
        field: record.field.into(),
        crop: record.crop.map(Crop::from),
        operations: operations.into_iter().map(Operation::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}/edit",
    params(
        ("id" = String, Path, description = "Field ID")
    ),
    responses(
        (status = 200, description = "Field form pre-filled with the stored values", body = FieldFormContext),
        (status = 404, description = "Field not found")
    ),
    tag = "fields",
    summary = "Edit field form"
)]
pub async fn edit_field_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> BusinessResult<Json<FieldFormContext>> {
    let field = services::get_field(&state.db, &id).await?;
    let crops = crops::list_crops(&state.db).await?;
    Ok(Json(FieldFormContext::edit_field(&field, &crops)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    params(
        ("id" = String, Path, description = "Field ID")
    ),
    request_body = FieldForm,
    responses(
        (status = 200, description = "Field updated; id and creation time are unchanged", body = Field),
        (status = 404, description = "Field not found"),
        (status = 422, description = "Validation failed; nothing was changed")
    ),
    tag = "fields",
    summary = "Update field"
)]
pub async fn update_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<Value>,
) -> BusinessResult<Json<Field>> {
    let txn = state.db.begin().await.map_err(|e| e.to_business_error("field"))?;
    // Unknown ids are reported before the form is looked at
    services::get_field(&txn, &id).await?;

    let form: FieldForm = bind_form(&input)?;
    let crop_options = crops::list_crops(&txn).await?;
    let bound = form.validate(&crop_options, &input)?;
    let field = services::update_field(&txn, &id, bound).await?;
    txn.commit().await.map_err(|e| e.to_business_error("field"))?;

    Ok(Json(field.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    params(
        ("id" = String, Path, description = "Field ID")
    ),
    responses(
        (status = 204, description = "Field and its operations deleted"),
        (status = 404, description = "Field not found")
    ),
    tag = "fields",
    summary = "Delete field",
    description = "Operations recorded on the field are deleted with it."
)]
pub async fn delete_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> BusinessResult<StatusCode> {
    let txn = state.db.begin().await.map_err(|e| e.to_business_error("field"))?;
    services::delete_field(&txn, &id).await?;
    txn.commit().await.map_err(|e| e.to_business_error("field"))?;

    Ok(StatusCode::NO_CONTENT)
}
