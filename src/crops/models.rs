use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::forms::{FormValidator, FormValue};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "crops")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub sowing: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub target_yield: f64,
    #[sea_orm(column_name = "value", column_type = "Double")]
    pub unit_value: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::fields::models::Entity")]
    Fields,
}

impl Related<crate::fields::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fields.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A crop type with the economics used by the dashboard
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Crop {
    pub id: String,
    pub name: String,
    pub sowing: Option<String>,
    /// Yield per unit area
    #[serde(rename = "targetYield")]
    pub target_yield: f64,
    /// Economic value per unit yield
    pub value: f64,
}

impl From<Model> for Crop {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            sowing: model.sowing,
            target_yield: model.target_yield,
            value: model.unit_value,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CropForm {
    pub id: Option<String>,
    pub name: Option<String>,
    pub sowing: Option<String>,
    #[serde(rename = "targetYield")]
    pub target_yield: Option<FormValue>,
    pub value: Option<FormValue>,
}

/// A validated crop, ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewCrop {
    pub id: String,
    pub name: String,
    pub sowing: Option<String>,
    pub target_yield: f64,
    pub unit_value: f64,
}

impl NewCrop {
    pub fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            id: Set(self.id),
            name: Set(self.name),
            sowing: Set(self.sowing),
            target_yield: Set(self.target_yield),
            unit_value: Set(self.unit_value),
        }
    }
}

impl CropForm {
    pub fn validate(self, input: &JsonValue) -> BusinessResult<NewCrop> {
        let mut validator = FormValidator::new();
        let id = validator.required_text("id", self.id);
        let name = validator.required_text("name", self.name);
        let target_yield = validator.required_number("targetYield", self.target_yield);
        let unit_value = validator.required_number("value", self.value);

        let crop = NewCrop {
            id: id.trim().to_string(),
            name,
            sowing: self.sowing,
            target_yield,
            unit_value,
        };
        validator.finish(crop, input)
    }
}

/// All crops in select-list order
pub async fn list_crops<C: ConnectionTrait>(db: &C) -> BusinessResult<Vec<Model>> {
    Entity::find()
        .order_by_asc(Column::Name)
        .order_by_asc(Column::Id)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("crop"))
}

pub async fn get_crop<C: ConnectionTrait>(db: &C, id: &str) -> BusinessResult<Model> {
    Entity::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(|e| e.to_business_error("crop"))?
        .ok_or_else(|| crate::not_found!("Crop", id))
}
