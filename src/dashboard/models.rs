use crate::fields::models::Field;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Subtotal for one crop name
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CropTotals {
    /// Area summed over every field carrying the crop
    pub area: f64,
    /// Target yield of the first field seen with the crop
    #[serde(rename = "yield")]
    pub crop_yield: f64,
    /// Value per unit yield of the first field seen with the crop
    pub value: f64,
}

/// Farm-wide totals computed from the fields that carry a crop
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub total_area: f64,
    pub total_value: f64,
    pub main_crop: String,
    /// Keyed by crop name, in name order
    pub crop_totals: BTreeMap<String, CropTotals>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardContext {
    pub title: String,
    /// Fields with a crop, by name
    pub fields: Vec<Field>,
    pub total_area: f64,
    pub total_value: f64,
    /// Most common crop name
    pub main_crop: String,
    /// Keyed by crop name, in name order
    pub crop_totals: BTreeMap<String, CropTotals>,
}

impl DashboardContext {
    pub fn new(fields: Vec<Field>, summary: DashboardSummary) -> Self {
        Self {
            title: "Home".to_string(),
            fields,
            total_area: summary.total_area,
            total_value: summary.total_value,
            main_crop: summary.main_crop,
            crop_totals: summary.crop_totals,
        }
    }
}
