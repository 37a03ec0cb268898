use crate::common::forms::FormErrors;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde_json::{Value, json};
use std::fmt;

/// Error types for business logic validation and application errors
#[derive(Debug, Clone)]
pub enum BusinessError {
    /// Submitted form did not validate (422 Unprocessable Entity). Carries the
    /// per-field messages and the input as submitted so it can be redisplayed.
    ValidationFailed { errors: FormErrors, input: Value },
    /// Resource not found (404 Not Found)
    NotFound { resource: String, id: String },
    /// Aggregation over an empty set (422 Unprocessable Entity)
    NoData { what: String },
    /// Duplicate resource (409 Conflict)
    Duplicate { resource: String, field: String },
    /// External service errors (502 Bad Gateway)
    ExternalServiceError { service: String, message: String },
    /// Generic application error (500 Internal Server Error)
    InternalError { message: String },
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessError::ValidationFailed { errors, .. } => {
                let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
                write!(f, "Validation failed for: {}", fields.join(", "))
            }
            BusinessError::NotFound { resource, id } => {
                write!(f, "{resource} with id '{id}' not found")
            }
            BusinessError::NoData { what } => {
                write!(f, "No data available to compute {what}")
            }
            BusinessError::Duplicate { resource, field } => {
                write!(f, "{resource} with this {field} already exists")
            }
            BusinessError::ExternalServiceError { service, message } => {
                write!(f, "External service '{service}' error: {message}")
            }
            BusinessError::InternalError { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for BusinessError {}

impl BusinessError {
    fn variant_name(&self) -> &'static str {
        match self {
            BusinessError::ValidationFailed { .. } => "ValidationFailed",
            BusinessError::NotFound { .. } => "NotFound",
            BusinessError::NoData { .. } => "NoData",
            BusinessError::Duplicate { .. } => "Duplicate",
            BusinessError::ExternalServiceError { .. } => "ExternalServiceError",
            BusinessError::InternalError { .. } => "InternalError",
        }
    }
}

/// Convert `BusinessError` to HTTP responses
impl IntoResponse for BusinessError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            BusinessError::ValidationFailed { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            BusinessError::NotFound { .. } => (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND"),
            BusinessError::NoData { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "NO_DATA"),
            BusinessError::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE_RESOURCE"),
            BusinessError::ExternalServiceError { .. } => {
                (StatusCode::BAD_GATEWAY, "EXTERNAL_SERVICE_ERROR")
            }
            BusinessError::InternalError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        if status.is_server_error() {
            tracing::error!("{self}");
        }

        let mut error = json!({
            "code": error_code,
            "message": self.to_string(),
            "type": self.variant_name(),
        });

        if let BusinessError::ValidationFailed { errors, input } = self {
            error["fields"] = json!(errors);
            error["input"] = input;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

/// Maps database errors onto business errors for a given resource context
pub struct ErrorMapper;

impl ErrorMapper {
    /// Map `DbErr` to appropriate HTTP responses with business context
    pub fn map_db_error(err: DbErr, context: &str) -> BusinessError {
        if let Some(SqlErr::UniqueConstraintViolation(msg)) = err.sql_err() {
            return BusinessError::Duplicate {
                resource: Self::extract_resource_from_context(context),
                field: Self::extract_field_from_constraint(&msg),
            };
        }

        match err {
            DbErr::RecordNotFound(msg) => BusinessError::NotFound {
                resource: Self::extract_resource_from_context(context),
                id: Self::extract_id_from_message(&msg),
            },
            DbErr::Conn(conn_err) => BusinessError::ExternalServiceError {
                service: "database".to_string(),
                message: conn_err.to_string(),
            },
            DbErr::Exec(exec_err) => {
                let err_msg = exec_err.to_string();
                if err_msg.contains("UNIQUE constraint") || err_msg.contains("duplicate key") {
                    BusinessError::Duplicate {
                        resource: Self::extract_resource_from_context(context),
                        field: Self::extract_field_from_constraint(&err_msg),
                    }
                } else {
                    BusinessError::InternalError { message: err_msg }
                }
            }
            _ => BusinessError::InternalError {
                message: err.to_string(),
            },
        }
    }

    /// Resource name from contexts like `"field"` or `"crop_option"`
    fn extract_resource_from_context(context: &str) -> String {
        context.replace('_', " ")
    }

    /// Pull the quoted id out of messages like `Field with id 'C-0042' not found`
    fn extract_id_from_message(msg: &str) -> String {
        for quote in ['\'', '"'] {
            let marker = format!(" id {quote}");
            if let Some(start_pos) = msg.find(&marker) {
                let after_id = &msg[start_pos + marker.len()..];
                if let Some(end_pos) = after_id.find(quote) {
                    return after_id[..end_pos].to_string();
                }
            }
        }

        // Fall back to anything shaped like one of our identifiers
        msg.split_whitespace()
            .map(|word| word.trim_matches('\'').trim_matches('"'))
            .find(|word| word.starts_with("C-") || word.starts_with("OP-"))
            .map_or_else(|| "unknown".to_string(), ToString::to_string)
    }

    fn extract_field_from_constraint(msg: &str) -> String {
        // SQLite reports "UNIQUE constraint failed: fields.id"
        if let Some((_, column)) = msg.rsplit_once('.') {
            let column = column.trim();
            if !column.is_empty() && column.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return column.to_string();
            }
        }
        if msg.contains("pkey") || msg.contains("id") {
            "id".to_string()
        } else {
            "field".to_string()
        }
    }
}

#[macro_export]
macro_rules! not_found {
    ($resource:expr, $id:expr) => {
        $crate::common::errors::BusinessError::NotFound {
            resource: $resource.to_string(),
            id: $id.to_string(),
        }
    };
}

#[macro_export]
macro_rules! duplicate_resource {
    ($resource:expr, $field:expr) => {
        $crate::common::errors::BusinessError::Duplicate {
            resource: $resource.to_string(),
            field: $field.to_string(),
        }
    };
}

/// Extension trait to add business error conversion to `DbErr`
pub trait DbErrorExt {
    fn to_business_error(self, context: &str) -> BusinessError;
}

impl DbErrorExt for DbErr {
    fn to_business_error(self, context: &str) -> BusinessError {
        ErrorMapper::map_db_error(self, context)
    }
}

/// Result type alias for business operations
pub type BusinessResult<T> = Result<T, BusinessError>;
