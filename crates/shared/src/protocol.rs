use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TriggerKind {
    Validation,
    DynamicValues,
    Healthcheck,
    Update,
    Other(String),
}

impl TriggerKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Validation => "validation",
            Self::DynamicValues => "dynamic_values",
            Self::Healthcheck => "healthcheck",
            Self::Update => "update",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for TriggerKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "validation" => Self::Validation,
            "dynamic_values" => Self::DynamicValues,
            "healthcheck" => Self::Healthcheck,
            "update" => Self::Update,
            _ => Self::Other(value),
        }
    }
}

impl From<TriggerKind> for String {
    fn from(value: TriggerKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a request body key to the property path its value is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerParameter {
    pub key: String,
    pub path: String,
}

/// Trigger declared on a ui schema element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerDefinition {
    pub action: String,
    pub family: String,
    #[serde(rename = "type")]
    pub kind: TriggerKind,
    #[serde(default)]
    pub parameters: Vec<TriggerParameter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "KO")]
    Ko,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueItem {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuesResponse {
    #[serde(default)]
    pub items: Vec<ValueItem>,
}
