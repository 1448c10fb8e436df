//! Unified application error model and mapping helpers.
//! Every handler failure is one of these; the HTTP layer turns each into a rendered
//! page with the status from `http_status`. A bad or missing session cookie is not an
//! error here: it downgrades the request to anonymous (see `identity::SessionState`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    /// Field name -> human readable message, for re-rendering forms.
    #[error("validation: {}", join_fields(.fields))]
    Validation { fields: BTreeMap<String, String> },
    #[error("duplicate_user: {name}")]
    DuplicateUser { name: String },
    #[error("invalid_credentials")]
    InvalidCredentials,
    #[error("{code}: {message}")]
    NotFound { code: String, message: String },
    #[error("{code}: {message}")]
    Forbidden { code: String, message: String },
    #[error("{code}: {message}")]
    Storage { code: String, message: String },
    #[error("render_error: {message}")]
    Render { template: String, message: String },
    #[error("{code}: {message}")]
    Internal { code: String, message: String },
}

fn join_fields(fields: &BTreeMap<String, String>) -> String {
    fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect::<Vec<_>>().join(", ")
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::Validation { .. } => "validation",
            AppError::DuplicateUser { .. } => "duplicate_user",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::Render { .. } => "render_error",
            AppError::NotFound { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::Storage { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    /// User-facing message. Validation errors report their first field message.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation { fields } => fields.values().next().cloned().unwrap_or_default(),
            AppError::DuplicateUser { .. } => "That user already exists.".to_string(),
            AppError::InvalidCredentials => "Invalid login".to_string(),
            AppError::Render { message, .. } => message.clone(),
            AppError::NotFound { message, .. }
            | AppError::Forbidden { message, .. }
            | AppError::Storage { message, .. }
            | AppError::Internal { message, .. } => message.clone(),
        }
    }

    pub fn validation(field: impl Into<String>, msg: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), msg.into());
        AppError::Validation { fields }
    }
    pub fn duplicate_user(name: impl Into<String>) -> Self { AppError::DuplicateUser { name: name.into() } }
    pub fn not_found(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::NotFound { code: code.into(), message: msg.into() } }
    pub fn forbidden(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Forbidden { code: code.into(), message: msg.into() } }
    pub fn storage(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Storage { code: code.into(), message: msg.into() } }
    pub fn render(template: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Render { template: template.into(), message: msg.into() } }
    pub fn internal(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// Field-level messages for form re-rendering; empty for non-validation errors.
    pub fn field_messages(&self) -> BTreeMap<String, String> {
        match self {
            AppError::Validation { fields } => fields.clone(),
            AppError::DuplicateUser { .. } => {
                let mut m = BTreeMap::new();
                m.insert("username".to_string(), self.message());
                m
            }
            _ => BTreeMap::new(),
        }
    }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::Validation { .. } => 400,
            AppError::DuplicateUser { .. } => 409,
            AppError::InvalidCredentials => 401,
            AppError::NotFound { .. } => 404,
            AppError::Forbidden { .. } => 403,
            AppError::Storage { .. } => 503,
            AppError::Render { .. } => 500,
            AppError::Internal { .. } => 500,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // Default mapping: collaborator failures surface as internal errors
        AppError::Internal { code: "internal_error".into(), message: err.to_string() }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
