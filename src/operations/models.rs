use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "operations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub date: NaiveDate,
    pub operation: String,
    pub detail: Option<String>,
    pub rate: Option<String>,
    pub field: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::fields::models::Entity",
        from = "Column::Field",
        to = "crate::fields::models::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Fields,
}

impl Related<crate::fields::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fields.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A management action carried out on a field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Operation {
    pub id: String,
    pub date: NaiveDate,
    /// What was done, e.g. "Sowing" or "Spraying"
    pub operation: String,
    /// Product or other detail
    pub detail: Option<String>,
    pub rate: Option<String>,
    /// ID of the field the operation was carried out on
    pub field: String,
}

impl From<Model> for Operation {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            date: model.date,
            operation: model.operation,
            detail: model.detail,
            rate: model.rate,
            field: model.field,
        }
    }
}

/// Result of deleting an operation: where the client should go next
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OperationDeleted {
    pub id: String,
    pub field_id: String,
    pub redirect_to: String,
}
