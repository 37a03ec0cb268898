use super::models::ActiveModel;
use crate::common::errors::BusinessResult;
use crate::common::forms::{FormValidator, SelectOption, format_date, select_options};
use crate::fields::models::{self as fields, Field};
use chrono::NaiveDate;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Submitted operation form
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OperationForm {
    /// `YYYY-MM-DD`; today when left out
    pub date: Option<String>,
    pub operation: Option<String>,
    pub detail: Option<String>,
    pub rate: Option<String>,
    /// Ignored on creation: the field comes from the route, so any JSON
    /// value is accepted here
    pub field: Option<Value>,
}

/// Every form-backed attribute of an operation after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationInput {
    pub date: NaiveDate,
    pub operation: String,
    pub detail: Option<String>,
    pub rate: Option<String>,
    pub field: String,
}

impl OperationForm {
    /// Pin the field selection, whatever was submitted
    #[must_use]
    pub fn preselect_field(mut self, field_id: &str) -> Self {
        self.field = Some(Value::String(field_id.to_string()));
        self
    }

    pub fn validate(
        self,
        field_options: &[fields::Model],
        today: NaiveDate,
        input: &Value,
    ) -> BusinessResult<OperationInput> {
        let mut validator = FormValidator::new();

        let date = validator.date_or("date", self.date, today);
        let operation = validator.required_text("operation", self.operation);
        let selected = self.field.and_then(|value| match value {
            Value::Null => None,
            Value::String(text) => Some(text),
            other => Some(other.to_string()),
        });
        let field = validator
            .choice("field", selected, field_options, |f| f.id.as_str(), false)
            .map(|f| f.id.clone())
            .unwrap_or_default();

        let bound = OperationInput {
            date,
            operation,
            detail: self.detail,
            rate: self.rate,
            field,
        };
        validator.finish(bound, input)
    }
}

impl OperationInput {
    pub fn into_new_operation(self, id: String) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            date: Set(self.date),
            operation: Set(self.operation),
            detail: Set(self.detail),
            rate: Set(self.rate),
            field: Set(self.field),
        }
    }
}

/// Values an operation form starts out with
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OperationFormValues {
    pub date: String,
    pub operation: Option<String>,
    pub detail: Option<String>,
    pub rate: Option<String>,
    pub field: String,
}

/// Everything needed to render the new operation form for a field
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct OperationFormContext {
    pub title: String,
    /// Fields by name; there is no blank option
    pub field_options: Vec<SelectOption>,
    pub values: OperationFormValues,
    pub field: Field,
}

impl OperationFormContext {
    pub fn new_operation(field: fields::Model, field_options: &[fields::Model], today: NaiveDate) -> Self {
        Self {
            title: "New Operation".to_string(),
            field_options: select_options(
                field_options,
                |f| f.id.as_str(),
                |f| f.name.as_str(),
                false,
            ),
            values: OperationFormValues {
                date: format_date(today),
                operation: None,
                detail: None,
                rate: None,
                field: field.id.clone(),
            },
            field: field.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::BusinessError;
    use crate::common::forms::{INVALID_CHOICE, REQUIRED, bind_form};
    use serde_json::json;

    fn field(id: &str, name: &str) -> fields::Model {
        fields::Model {
            id: id.to_string(),
            name: name.to_string(),
            area: 4.0,
            soil_type: "Loam".to_string(),
            risk: "Low".to_string(),
            irrigation: "None".to_string(),
            drainage: "Good".to_string(),
            ph: 6.5,
            som: 2.5,
            sowing_date: None,
            notes: None,
            created: "2025-01-01T00:00:00.000000+00:00".to_string(),
            crop: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 2).unwrap()
    }

    #[test]
    fn test_preselected_field_overrides_submission() {
        let options = [field("C-0001", "Home"), field("C-0002", "Away")];
        let input = json!({"operation": "Spraying", "field": "C-0002"});
        let form: OperationForm = bind_form(&input).unwrap();

        let bound = form
            .preselect_field("C-0001")
            .validate(&options, today(), &input)
            .unwrap();
        assert_eq!(bound.field, "C-0001");
    }

    #[test]
    fn test_preselection_ignores_submitted_field_type() {
        let options = [field("C-0001", "Home")];
        let input = json!({"operation": "Spraying", "field": 42});
        let form: OperationForm = bind_form(&input).unwrap();

        let bound = form
            .preselect_field("C-0001")
            .validate(&options, today(), &input)
            .unwrap();
        assert_eq!(bound.field, "C-0001");
    }

    #[test]
    fn test_unknown_submitted_field_is_invalid_choice() {
        let options = [field("C-0001", "Home")];
        let input = json!({"operation": "Spraying", "field": 42});
        let form: OperationForm = bind_form(&input).unwrap();

        match form.validate(&options, today(), &input) {
            Err(BusinessError::ValidationFailed { errors, .. }) => {
                assert_eq!(errors["field"], vec![INVALID_CHOICE]);
            }
            other => panic!("Expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_date_defaults_to_today() {
        let options = [field("C-0001", "Home")];
        let input = json!({"operation": "Sowing", "detail": "Skyfall", "rate": "180 kg/ha"});
        let form: OperationForm = bind_form(&input).unwrap();

        let bound = form
            .preselect_field("C-0001")
            .validate(&options, today(), &input)
            .unwrap();
        assert_eq!(bound.date, today());
        assert_eq!(bound.detail.as_deref(), Some("Skyfall"));
        assert_eq!(bound.rate.as_deref(), Some("180 kg/ha"));
    }

    #[test]
    fn test_explicit_date_is_kept() {
        let options = [field("C-0001", "Home")];
        let input = json!({"operation": "Harvest", "date": "2024-08-20"});
        let form: OperationForm = bind_form(&input).unwrap();

        let bound = form
            .preselect_field("C-0001")
            .validate(&options, today(), &input)
            .unwrap();
        assert_eq!(bound.date, NaiveDate::from_ymd_opt(2024, 8, 20).unwrap());
    }

    #[test]
    fn test_field_has_no_blank_choice() {
        let options = [field("C-0001", "Home")];
        let input = json!({"date": "", "operation": ""});
        let form: OperationForm = bind_form(&input).unwrap();

        match form.validate(&options, today(), &input) {
            Err(BusinessError::ValidationFailed { errors, .. }) => {
                assert_eq!(errors["field"], vec![INVALID_CHOICE]);
                assert_eq!(errors["date"], vec![REQUIRED]);
                assert_eq!(errors["operation"], vec![REQUIRED]);
            }
            other => panic!("Expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_form_context_defaults() {
        let options = [field("C-0002", "Away"), field("C-0001", "Home")];
        let context = OperationFormContext::new_operation(field("C-0001", "Home"), &options, today());
        assert_eq!(context.title, "New Operation");
        assert_eq!(context.values.date, "2025-04-02");
        assert_eq!(context.values.field, "C-0001");
        assert_eq!(context.field_options.len(), 2);
        assert_eq!(context.field_options[0].label, "Away");
        assert_eq!(context.field.name, "Home");
    }
}
