//! Form binding and validation shared by the field, operation and crop forms.
//!
//! Forms arrive as JSON objects whose members are all optional so that a
//! missing value becomes a per-field message rather than a rejected body.
//! Validation collects every message before failing, and a failed form is
//! reported together with the input exactly as it was submitted.

use crate::common::errors::{BusinessError, BusinessResult};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Field name → messages, in field-name order
pub type FormErrors = BTreeMap<String, Vec<String>>;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_FLOAT: &str = "Not a valid float value.";
pub const INVALID_DATE: &str = "Not a valid date value.";
pub const INVALID_CHOICE: &str = "Not a valid choice.";

/// Select value posted by HTML forms for the blank option
const BLANK_CHOICE: &str = "__None";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A numeric form input, sent either as a JSON number or as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        FormValue::Number(value)
    }
}

/// One entry of a relationship select list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn blank() -> Self {
        Self {
            value: String::new(),
            label: String::new(),
        }
    }
}

/// Build the options for a select field from records already in display order
pub fn select_options<T>(
    items: &[T],
    value: impl Fn(&T) -> &str,
    label: impl Fn(&T) -> &str,
    allow_blank: bool,
) -> Vec<SelectOption> {
    let blank = allow_blank.then(SelectOption::blank);
    blank
        .into_iter()
        .chain(items.iter().map(|item| SelectOption {
            value: value(item).to_string(),
            label: label(item).to_string(),
        }))
        .collect()
}

/// Deserialize a submitted JSON object into a form struct
pub fn bind_form<T: DeserializeOwned>(input: &Value) -> BusinessResult<T> {
    serde_json::from_value(input.clone()).map_err(|e| {
        let mut errors = FormErrors::new();
        errors.insert("form".to_string(), vec![e.to_string()]);
        BusinessError::ValidationFailed {
            errors,
            input: input.clone(),
        }
    })
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Accumulates per-field messages while a form is being checked
#[derive(Debug, Default)]
pub struct FormValidator {
    errors: FormErrors,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, name: &str, message: &str) {
        self.errors
            .entry(name.to_string())
            .or_default()
            .push(message.to_string());
    }

    /// Text that must be present and not just whitespace. The value is kept
    /// as submitted.
    pub fn required_text(&mut self, name: &str, value: Option<String>) -> String {
        match value {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                self.add_error(name, REQUIRED);
                String::new()
            }
        }
    }

    /// Number that must be present and non-zero, zero counting as missing
    pub fn required_float(&mut self, name: &str, value: Option<FormValue>) -> f64 {
        match self.float(name, value) {
            Some(number) if number != 0.0 => number,
            Some(_) => {
                self.add_error(name, REQUIRED);
                0.0
            }
            None => 0.0,
        }
    }

    /// Number that must be present; zero is accepted
    pub fn required_number(&mut self, name: &str, value: Option<FormValue>) -> f64 {
        self.float(name, value).unwrap_or(0.0)
    }

    fn float(&mut self, name: &str, value: Option<FormValue>) -> Option<f64> {
        let parsed = match value {
            None => None,
            Some(FormValue::Number(number)) => Some(Ok(number)),
            Some(FormValue::Text(text)) if text.trim().is_empty() => None,
            Some(FormValue::Text(text)) => Some(text.trim().parse::<f64>().map_err(|_| ())),
        };

        match parsed {
            Some(Ok(number)) if number.is_finite() => Some(number),
            Some(_) => {
                self.add_error(name, INVALID_FLOAT);
                None
            }
            None => {
                self.add_error(name, REQUIRED);
                None
            }
        }
    }

    pub fn optional_date(&mut self, name: &str, value: Option<String>) -> Option<NaiveDate> {
        match value {
            None => None,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => {
                let parsed = parse_date(&raw);
                if parsed.is_none() {
                    self.add_error(name, INVALID_DATE);
                }
                parsed
            }
        }
    }

    /// Date that falls back to `default` when the input leaves it out
    /// entirely; a blank value is still an error
    pub fn date_or(&mut self, name: &str, value: Option<String>, default: NaiveDate) -> NaiveDate {
        match value {
            None => default,
            Some(raw) if raw.trim().is_empty() => {
                self.add_error(name, REQUIRED);
                default
            }
            Some(raw) => parse_date(&raw).unwrap_or_else(|| {
                self.add_error(name, INVALID_DATE);
                default
            }),
        }
    }

    /// Resolve a select value against its option records. A blank selection
    /// yields `None` when `allow_blank` is set and is an invalid choice
    /// otherwise.
    pub fn choice<'a, T>(
        &mut self,
        name: &str,
        value: Option<String>,
        options: &'a [T],
        key: impl Fn(&T) -> &str,
        allow_blank: bool,
    ) -> Option<&'a T> {
        let selected = value.filter(|v| !v.is_empty() && v != BLANK_CHOICE);
        let Some(selected) = selected else {
            if !allow_blank {
                self.add_error(name, INVALID_CHOICE);
            }
            return None;
        };

        let found = options.iter().find(|option| key(option) == selected);
        if found.is_none() {
            self.add_error(name, INVALID_CHOICE);
        }
        found
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Hand back the bound value, or every collected message with the input
    pub fn finish<T>(self, bound: T, input: &Value) -> BusinessResult<T> {
        if self.is_valid() {
            Ok(bound)
        } else {
            Err(BusinessError::ValidationFailed {
                errors: self.errors,
                input: input.clone(),
            })
        }
    }
}
