use super::forms::FieldInput;
use super::models::{self as fields, FieldRecord, FieldWithCrop};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::identifiers::allocate_field_id;
use crate::crops::models as crops;
use crate::operations::models as operations;
use chrono::{SecondsFormat, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

/// Creation timestamp in the stored ISO-8601 form, e.g.
/// `2025-03-01T09:30:00.123456+00:00`
pub fn created_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

pub async fn get_field<C: ConnectionTrait>(db: &C, id: &str) -> BusinessResult<fields::Model> {
    fields::Entity::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(|e| e.to_business_error("field"))?
        .ok_or_else(|| crate::not_found!("Field", id))
}

/// Load a field together with its crop, if it has one
pub async fn get_field_with_crop<C: ConnectionTrait>(db: &C, id: &str) -> BusinessResult<FieldRecord> {
    let (field, crop) = fields::Entity::find_by_id(id.to_string())
        .find_also_related(crops::Entity)
        .one(db)
        .await
        .map_err(|e| e.to_business_error("field"))?
        .ok_or_else(|| crate::not_found!("Field", id))?;

    Ok(FieldRecord { field, crop })
}

/// Fields that carry a crop, ordered by field name. Fields without a crop
/// are left out.
pub async fn list_fields_with_crop<C: ConnectionTrait>(db: &C) -> BusinessResult<Vec<FieldWithCrop>> {
    let rows = fields::Entity::find()
        .find_also_related(crops::Entity)
        .filter(crops::Column::Id.is_not_null())
        .order_by_asc(fields::Column::Name)
        .order_by_asc(fields::Column::Id)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("field"))?;

    Ok(rows
        .into_iter()
        .filter_map(|(field, crop)| crop.map(|crop| FieldWithCrop { field, crop }))
        .collect())
}

/// Every field in select-list order
pub async fn list_fields<C: ConnectionTrait>(db: &C) -> BusinessResult<Vec<fields::Model>> {
    fields::Entity::find()
        .order_by_asc(fields::Column::Name)
        .order_by_asc(fields::Column::Id)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("field"))
}

/// Insert a new field under a freshly allocated id
pub async fn create_field<C: ConnectionTrait>(
    db: &C,
    input: FieldInput,
    id_attempts: u32,
) -> BusinessResult<fields::Model> {
    let id = allocate_field_id(db, id_attempts).await?;
    let field = input
        .into_new_field(id, created_timestamp())
        .insert(db)
        .await
        .map_err(|e| e.to_business_error("field"))?;

    tracing::info!("Created field {} ({})", field.id, field.name);
    Ok(field)
}

/// Overwrite the form-backed attributes of an existing field
pub async fn update_field<C: ConnectionTrait>(
    db: &C,
    id: &str,
    input: FieldInput,
) -> BusinessResult<fields::Model> {
    let existing = get_field(db, id).await?;
    let field = input
        .onto(existing)
        .update(db)
        .await
        .map_err(|e| e.to_business_error("field"))?;

    tracing::info!("Updated field {}", field.id);
    Ok(field)
}

/// Delete a field and the operations recorded on it. Returns the number of
/// operations removed.
pub async fn delete_field<C: ConnectionTrait>(db: &C, id: &str) -> BusinessResult<u64> {
    let field = get_field(db, id).await?;

    let removed = operations::Entity::delete_many()
        .filter(operations::Column::Field.eq(field.id.clone()))
        .exec(db)
        .await
        .map_err(|e| e.to_business_error("operation"))?
        .rows_affected;

    field
        .delete(db)
        .await
        .map_err(|e| e.to_business_error("field"))?;

    tracing::info!("Deleted field {id} and {removed} operation(s)");
    Ok(removed)
}
