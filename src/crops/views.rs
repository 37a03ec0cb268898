use super::models::{self, Crop, CropForm};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::forms::bind_form;
use crate::common::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use sea_orm::{ActiveModelTrait, EntityTrait, TransactionTrait};
use serde_json::Value;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_crops))
        .routes(routes!(create_crop))
        .routes(routes!(get_crop))
        .with_state(state.clone())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "All crops ordered by name", body = Vec<Crop>),
        (status = 500, description = "Internal server error")
    ),
    tag = "crops",
    summary = "List crops"
)]
pub async fn list_crops(State(state): State<AppState>) -> BusinessResult<Json<Vec<Crop>>> {
    let crops = models::list_crops(&state.db).await?;
    Ok(Json(crops.into_iter().map(Crop::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    request_body = CropForm,
    responses(
        (status = 201, description = "Crop created", body = Crop),
        (status = 409, description = "A crop with this id already exists"),
        (status = 422, description = "Validation failed")
    ),
    tag = "crops",
    summary = "Create crop",
    description = "Crops carry client-chosen identifiers; the id must not be taken yet."
)]
pub async fn create_crop(
    State(state): State<AppState>,
    Json(input): Json<Value>,
) -> BusinessResult<(StatusCode, Json<Crop>)> {
    let form: CropForm = bind_form(&input)?;
    let crop = form.validate(&input)?;

    let txn = state.db.begin().await.map_err(|e| e.to_business_error("crop"))?;
    if models::Entity::find_by_id(crop.id.clone())
        .one(&txn)
        .await
        .map_err(|e| e.to_business_error("crop"))?
        .is_some()
    {
        return Err(crate::duplicate_resource!("crop", "id"));
    }

    let inserted = crop
        .into_active_model()
        .insert(&txn)
        .await
        .map_err(|e| e.to_business_error("crop"))?;
    txn.commit().await.map_err(|e| e.to_business_error("crop"))?;

    tracing::info!("Created crop {} ({})", inserted.id, inserted.name);
    Ok((StatusCode::CREATED, Json(inserted.into())))
}

#[utoipa::path(
    get,
    path = "/{id}",
    params(
        ("id" = String, Path, description = "Crop ID")
    ),
    responses(
        (status = 200, description = "The crop", body = Crop),
        (status = 404, description = "Crop not found")
    ),
    tag = "crops",
    summary = "Get crop"
)]
pub async fn get_crop(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> BusinessResult<Json<Crop>> {
    let crop = models::get_crop(&state.db, &id).await?;
    Ok(Json(crop.into()))
}
