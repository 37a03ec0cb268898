//! Dashboard aggregation over fields that carry a crop.
//!
//! Everything here except [`load_dashboard`] is a pure function of its input.

use super::models::{CropTotals, DashboardContext, DashboardSummary};
use crate::common::errors::{BusinessError, BusinessResult};
use crate::fields::models::{Field, FieldWithCrop};
use crate::fields::services::list_fields_with_crop;
use sea_orm::ConnectionTrait;
use std::collections::{BTreeMap, HashMap};

pub fn total_area(fields: &[FieldWithCrop]) -> f64 {
    fields.iter().map(|f| f.field.area).sum()
}

/// Estimated value: area × value per unit yield × target yield, summed
pub fn total_value(fields: &[FieldWithCrop]) -> f64 {
    fields
        .iter()
        .map(|f| f.field.area * f.crop.unit_value * f.crop.target_yield)
        .sum()
}

/// The crop name carried by the most fields. Ties go to the name seen first.
pub fn main_crop(fields: &[FieldWithCrop]) -> BusinessResult<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut seen: Vec<&str> = Vec::new();
    for f in fields {
        let name = f.crop.name.as_str();
        let count = counts.entry(name).or_insert(0);
        if *count == 0 {
            seen.push(name);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for name in seen {
        let count = counts[name];
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((name, count));
        }
    }

    best.map(|(name, _)| name.to_string())
        .ok_or_else(|| BusinessError::NoData {
            what: "the main crop".to_string(),
        })
}

/// Per crop name: summed area, with yield and value taken from the first
/// field seen for that name. Keys come out sorted by crop name, not in the
/// order the fields were seen.
pub fn crop_totals(fields: &[FieldWithCrop]) -> BTreeMap<String, CropTotals> {
    let mut totals: BTreeMap<String, CropTotals> = BTreeMap::new();
    for f in fields {
        totals
            .entry(f.crop.name.clone())
            .and_modify(|t| t.area += f.field.area)
            .or_insert_with(|| CropTotals {
                area: f.field.area,
                crop_yield: f.crop.target_yield,
                value: f.crop.unit_value,
            });
    }
    totals
}

pub fn summarise(fields: &[FieldWithCrop]) -> BusinessResult<DashboardSummary> {
    Ok(DashboardSummary {
        main_crop: main_crop(fields)?,
        total_area: total_area(fields),
        total_value: total_value(fields),
        crop_totals: crop_totals(fields),
    })
}

pub async fn load_dashboard<C: ConnectionTrait>(db: &C) -> BusinessResult<DashboardContext> {
    let fields = list_fields_with_crop(db).await?;
    let summary = summarise(&fields)?;
    tracing::debug!(
        "Dashboard over {} field(s), main crop {}",
        fields.len(),
        summary.main_crop
    );

    let fields = fields.into_iter().map(|f| Field::from(f.field)).collect();
    Ok(DashboardContext::new(fields, summary))
}
