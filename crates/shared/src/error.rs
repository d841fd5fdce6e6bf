use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::TodoId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Unavailable,
    Internal,
}

/// Messages per offending field, e.g. `{"title": ["the title field is required"]}`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: FieldErrors,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }

    pub fn validation(fields: FieldErrors) -> Self {
        let message = fields
            .values()
            .flatten()
            .next()
            .cloned()
            .unwrap_or_else(|| "the given data was invalid".to_string());
        Self {
            code: ErrorCode::Validation,
            message,
            fields,
        }
    }

    pub fn todo_not_found(id: TodoId) -> Self {
        Self::new(ErrorCode::NotFound, format!("todo {id} not found"))
    }

    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    pub fn is_validation(&self) -> bool {
        self.code == ErrorCode::Validation
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
