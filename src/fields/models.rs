use crate::crops::models::{self as crops, Crop};
use crate::operations::models::Operation;
use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fields")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(column_type = "Double")]
    pub area: f64,
    pub soil_type: String,
    pub risk: String,
    pub irrigation: String,
    pub drainage: String,
    #[sea_orm(column_type = "Double")]
    pub ph: f64,
    #[sea_orm(column_type = "Double")]
    pub som: f64,
    pub sowing_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    /// ISO-8601 UTC timestamp, set once at creation
    pub created: String,
    pub crop: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::crops::models::Entity",
        from = "Column::Crop",
        to = "crate::crops::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Crops,
    #[sea_orm(has_many = "crate::operations::models::Entity")]
    Operations,
}

impl Related<crate::crops::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Crops.def()
    }
}

impl Related<crate::operations::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Operations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A field joined with the crop it currently carries. Only fields that have a
/// crop can be represented, which is what the dashboard totals require.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldWithCrop {
    pub field: Model,
    pub crop: crops::Model,
}

/// A field with its optional crop, as loaded for the detail view
#[derive(Clone, Debug, PartialEq)]
pub struct FieldRecord {
    pub field: Model,
    pub crop: Option<crops::Model>,
}

/// A land parcel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Field {
    pub id: String,
    pub name: String,
    pub area: f64,
    #[serde(rename = "soilType")]
    pub soil_type: String,
    pub risk: String,
    pub irrigation: String,
    pub drainage: String,
    #[serde(rename = "pH")]
    pub ph: f64,
    /// Soil organic matter
    #[serde(rename = "SOM")]
    pub som: f64,
    #[serde(rename = "sowingDate")]
    pub sowing_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created: String,
    /// ID of the current crop, if any
    pub crop: Option<String>,
}

impl From<Model> for Field {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            area: model.area,
            soil_type: model.soil_type,
            risk: model.risk,
            irrigation: model.irrigation,
            drainage: model.drainage,
            ph: model.ph,
            som: model.som,
            sowing_date: model.sowing_date,
            notes: model.notes,
            created: model.created,
            crop: model.crop,
        }
    }
}

/// Detail view of one field: the record, its crop and its operations by date
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FieldDetail {
    pub title: String,
    pub field: Field,
    pub crop: Option<Crop>,
    pub operations: Vec<Operation>,
}
