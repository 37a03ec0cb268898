use super::forms::OperationInput;
use super::models as operations;
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::identifiers::allocate_operation_id;
use chrono::{Local, NaiveDate};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder};

/// The date a new operation form defaults to
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn get_operation<C: ConnectionTrait>(db: &C, id: &str) -> BusinessResult<operations::Model> {
    operations::Entity::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(|e| e.to_business_error("operation"))?
        .ok_or_else(|| crate::not_found!("Operation", id))
}

/// Operations recorded on a field, oldest first
pub async fn list_operations_for_field<C: ConnectionTrait>(
    db: &C,
    field_id: &str,
) -> BusinessResult<Vec<operations::Model>> {
    operations::Entity::find()
        .filter(operations::Column::Field.eq(field_id))
        .order_by_asc(operations::Column::Date)
        .order_by_asc(operations::Column::Id)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("operation"))
}

pub async fn create_operation<C: ConnectionTrait>(
    db: &C,
    input: OperationInput,
    id_attempts: u32,
) -> BusinessResult<operations::Model> {
    let id = allocate_operation_id(db, id_attempts).await?;
    let operation = input
        .into_new_operation(id)
        .insert(db)
        .await
        .map_err(|e| e.to_business_error("operation"))?;

    tracing::info!(
        "Recorded operation {} ({}) on field {}",
        operation.id,
        operation.operation,
        operation.field
    );
    Ok(operation)
}

/// Delete an operation, returning the id of the field it belonged to
pub async fn delete_operation<C: ConnectionTrait>(db: &C, id: &str) -> BusinessResult<String> {
    let operation = get_operation(db, id).await?;
    // The record is gone after the delete, so keep its field first
    let field_id = operation.field.clone();

    operation
        .delete(db)
        .await
        .map_err(|e| e.to_business_error("operation"))?;

    tracing::info!("Deleted operation {id} from field {field_id}");
    Ok(field_id)
}
