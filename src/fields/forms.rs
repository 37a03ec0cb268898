use super::models::{ActiveModel, Model};
use crate::common::errors::BusinessResult;
use crate::common::forms::{FormValidator, FormValue, SelectOption, format_date, select_options};
use crate::crops::models as crops;
use chrono::NaiveDate;
use sea_orm::{IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Submitted field form. The id is never part of the form.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct FieldForm {
    pub name: Option<String>,
    #[serde(rename = "pH")]
    pub ph: Option<FormValue>,
    pub area: Option<FormValue>,
    #[serde(rename = "SOM")]
    pub som: Option<FormValue>,
    #[serde(rename = "soilType")]
    pub soil_type: Option<String>,
    pub risk: Option<String>,
    pub irrigation: Option<String>,
    pub drainage: Option<String>,
    #[serde(rename = "sowingDate")]
    pub sowing_date: Option<String>,
    pub notes: Option<String>,
    /// Crop ID picked from the crop options; blank for no crop
    pub crop: Option<String>,
}

/// Every form-backed attribute of a field after validation
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInput {
    pub name: String,
    pub area: f64,
    pub soil_type: String,
    pub risk: String,
    pub irrigation: String,
    pub drainage: String,
    pub ph: f64,
    pub som: f64,
    pub sowing_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub crop: Option<String>,
}

impl FieldForm {
    /// Check the submission against the current crop options
    pub fn validate(self, crop_options: &[crops::Model], input: &Value) -> BusinessResult<FieldInput> {
        let mut validator = FormValidator::new();

        let name = validator.required_text("name", self.name);
        let ph = validator.required_float("pH", self.ph);
        let area = validator.required_float("area", self.area);
        let som = validator.required_float("SOM", self.som);
        let soil_type = validator.required_text("soilType", self.soil_type);
        let risk = validator.required_text("risk", self.risk);
        let irrigation = validator.required_text("irrigation", self.irrigation);
        let drainage = validator.required_text("drainage", self.drainage);
        let sowing_date = validator.optional_date("sowingDate", self.sowing_date);
        let crop = validator
            .choice("crop", self.crop, crop_options, |c| c.id.as_str(), true)
            .map(|c| c.id.clone());

        let bound = FieldInput {
            name,
            area,
            soil_type,
            risk,
            irrigation,
            drainage,
            ph,
            som,
            sowing_date,
            notes: self.notes,
            crop,
        };
        validator.finish(bound, input)
    }
}

impl FieldInput {
    /// Overwrite every form-backed attribute of `field`; id and creation time
    /// are left alone
    pub fn apply_to(self, field: &mut ActiveModel) {
        let FieldInput {
            name,
            area,
            soil_type,
            risk,
            irrigation,
            drainage,
            ph,
            som,
            sowing_date,
            notes,
            crop,
        } = self;

        field.name = Set(name);
        field.area = Set(area);
        field.soil_type = Set(soil_type);
        field.risk = Set(risk);
        field.irrigation = Set(irrigation);
        field.drainage = Set(drainage);
        field.ph = Set(ph);
        field.som = Set(som);
        field.sowing_date = Set(sowing_date);
        field.notes = Set(notes);
        field.crop = Set(crop);
    }

    /// A brand-new field record under a generated id
    pub fn into_new_field(self, id: String, created: String) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            name: Set(self.name),
            area: Set(self.area),
            soil_type: Set(self.soil_type),
            risk: Set(self.risk),
            irrigation: Set(self.irrigation),
            drainage: Set(self.drainage),
            ph: Set(self.ph),
            som: Set(self.som),
            sowing_date: Set(self.sowing_date),
            notes: Set(self.notes),
            created: Set(created),
            crop: Set(self.crop),
        }
    }

    /// Apply to a loaded record, producing the active model to update
    pub fn onto(self, existing: Model) -> ActiveModel {
        let mut field = existing.into_active_model();
        self.apply_to(&mut field);
        field
    }
}

/// Values a field form starts out with
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldFormValues {
    pub name: Option<String>,
    #[serde(rename = "pH")]
    pub ph: Option<f64>,
    pub area: Option<f64>,
    #[serde(rename = "SOM")]
    pub som: Option<f64>,
    #[serde(rename = "soilType")]
    pub soil_type: Option<String>,
    pub risk: Option<String>,
    pub irrigation: Option<String>,
    pub drainage: Option<String>,
    #[serde(rename = "sowingDate")]
    pub sowing_date: Option<String>,
    pub notes: Option<String>,
    pub crop: Option<String>,
}

impl From<&Model> for FieldFormValues {
    fn from(field: &Model) -> Self {
        Self {
            name: Some(field.name.clone()),
            ph: Some(field.ph),
            area: Some(field.area),
            som: Some(field.som),
            soil_type: Some(field.soil_type.clone()),
            risk: Some(field.risk.clone()),
            irrigation: Some(field.irrigation.clone()),
            drainage: Some(field.drainage.clone()),
            sowing_date: field.sowing_date.map(format_date),
            notes: field.notes.clone(),
            crop: field.crop.clone(),
        }
    }
}

/// Everything needed to render the new/edit field form
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FieldFormContext {
    pub title: String,
    /// Crops by name, led by a blank option
    pub crop_options: Vec<SelectOption>,
    pub values: FieldFormValues,
}

impl FieldFormContext {
    pub fn new_field(crops: &[crops::Model]) -> Self {
        Self {
            title: "New Field".to_string(),
            crop_options: crop_options(crops),
            values: FieldFormValues::default(),
        }
    }

    pub fn edit_field(field: &Model, crops: &[crops::Model]) -> Self {
        Self {
            title: format!("Edit {}", field.id),
            crop_options: crop_options(crops),
            values: FieldFormValues::from(field),
        }
    }
}

fn crop_options(crops: &[crops::Model]) -> Vec<SelectOption> {
    select_options(crops, |c| c.id.as_str(), |c| c.name.as_str(), true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::forms::{INVALID_CHOICE, INVALID_DATE, REQUIRED};
    use crate::common::errors::BusinessError;
    use serde_json::json;

    fn wheat() -> crops::Model {
        crops::Model {
            id: "WHT".to_string(),
            name: "Wheat".to_string(),
            sowing: Some("Autumn".to_string()),
            target_yield: 8.0,
            unit_value: 180.0,
        }
    }

    fn valid_input() -> Value {
        json!({
            "name": "Long Meadow",
            "pH": 6.8,
            "area": "12.5",
            "SOM": 3.2,
            "soilType": "Clay loam",
            "risk": "Low",
            "irrigation": "None",
            "drainage": "Good",
            "sowingDate": "2024-10-01",
            "notes": "",
            "crop": "WHT"
        })
    }

    fn validate(input: &Value) -> BusinessResult<FieldInput> {
        let form: FieldForm = crate::common::forms::bind_form(input)?;
        form.validate(&[wheat()], input)
    }

    #[test]
    fn test_valid_form_binds_every_attribute() {
        let bound = validate(&valid_input()).unwrap();
        assert_eq!(bound.name, "Long Meadow");
        assert!((bound.area - 12.5).abs() < f64::EPSILON);
        assert_eq!(bound.soil_type, "Clay loam");
        assert_eq!(bound.sowing_date, NaiveDate::from_ymd_opt(2024, 10, 1));
        assert_eq!(bound.notes.as_deref(), Some(""));
        assert_eq!(bound.crop.as_deref(), Some("WHT"));
    }

    #[test]
    fn test_blank_crop_means_no_crop() {
        let mut input = valid_input();
        input["crop"] = json!("");
        assert_eq!(validate(&input).unwrap().crop, None);

        input["crop"] = Value::Null;
        assert_eq!(validate(&input).unwrap().crop, None);
    }

    #[test]
    fn test_errors_are_reported_per_field() {
        let input = json!({
            "name": "",
            "pH": "acidic",
            "sowingDate": "next week",
            "crop": "MAIZE"
        });

        match validate(&input) {
            Err(BusinessError::ValidationFailed { errors, input: echoed }) => {
                assert_eq!(errors["name"], vec![REQUIRED]);
                assert_eq!(errors["pH"], vec!["Not a valid float value."]);
                assert_eq!(errors["area"], vec![REQUIRED]);
                assert_eq!(errors["sowingDate"], vec![INVALID_DATE]);
                assert_eq!(errors["crop"], vec![INVALID_CHOICE]);
                assert!(!errors.contains_key("notes"));
                assert_eq!(echoed, input);
            }
            other => panic!("Expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_edit_keeps_id_and_created() {
        let existing = Model {
            id: "C-0001".to_string(),
            name: "Old".to_string(),
            area: 1.0,
            soil_type: "Sand".to_string(),
            risk: "High".to_string(),
            irrigation: "Pivot".to_string(),
            drainage: "Poor".to_string(),
            ph: 5.5,
            som: 1.0,
            sowing_date: None,
            notes: Some("old notes".to_string()),
            created: "2024-01-01T00:00:00.000000+00:00".to_string(),
            crop: None,
        };

        let updated = validate(&valid_input()).unwrap().onto(existing);
        assert_eq!(updated.id, sea_orm::ActiveValue::Unchanged("C-0001".to_string()));
        assert_eq!(
            updated.created,
            sea_orm::ActiveValue::Unchanged("2024-01-01T00:00:00.000000+00:00".to_string())
        );
        assert_eq!(updated.name, Set("Long Meadow".to_string()));
        assert_eq!(updated.notes, Set(Some(String::new())));
        assert_eq!(updated.crop, Set(Some("WHT".to_string())));
    }

    #[test]
    fn test_form_context_options() {
        let barley = crops::Model {
            id: "BAR".to_string(),
            name: "Barley".to_string(),
            sowing: None,
            target_yield: 7.0,
            unit_value: 160.0,
        };
        let context = FieldFormContext::new_field(&[barley, wheat()]);
        assert_eq!(context.title, "New Field");
        assert_eq!(context.crop_options[0], SelectOption::blank());
        assert_eq!(context.crop_options[1].label, "Barley");
        assert_eq!(context.crop_options[2].value, "WHT");
        assert_eq!(context.values, FieldFormValues::default());
    }
}
