use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ComponentMissing,
    ActionMissing,
    ActionError,
    BadFormat,
    #[serde(other)]
    Unexpected,
}

/// Error body returned by the component server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    #[serde(default)]
    pub description: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }
}

#[derive(Debug, Error)]
#[error("{code:?}: {description}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub description: String,
}

/// A property merge reached a value that cannot take the merged keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot merge properties at '{path}': {reason}")]
pub struct PropertyPathError {
    pub path: String,
    pub reason: String,
}

impl From<ApiError> for ApiException {
    fn from(value: ApiError) -> Self {
        Self {
            code: value.code,
            description: value.description,
        }
    }
}
