use shared::{domain::ComponentId, error::ApiError};
use thiserror::Error;

fn api_error_suffix(api_error: &Option<ApiError>) -> String {
    match api_error {
        Some(err) => format!(" ({:?}: {})", err.code, err.description),
        None => String::new(),
    }
}

/// The component detail could not be produced.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid component detail endpoint '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("component server unreachable while loading {component_id}: {source}")]
    Unreachable {
        component_id: ComponentId,
        #[source]
        source: reqwest::Error,
    },
    #[error("loading {component_id} failed with status {status}{}", api_error_suffix(.api_error))]
    Status {
        component_id: ComponentId,
        status: u16,
        api_error: Option<ApiError>,
    },
    #[error("malformed component detail for {component_id}: {source}")]
    MalformedBody {
        component_id: ComponentId,
        #[source]
        source: serde_json::Error,
    },
}

/// A trigger call did not produce an outcome. Committed detail state is never
/// touched when this is returned.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("invalid trigger endpoint '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("trigger endpoint unreachable for action {action}: {source}")]
    Unreachable {
        action: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("trigger action {action} failed with status {status}{}", api_error_suffix(.api_error))]
    Status {
        action: String,
        status: u16,
        api_error: Option<ApiError>,
    },
    #[error("malformed response for trigger action {action}: {reason}")]
    MalformedBody { action: String, reason: String },
}

impl TriggerError {
    pub fn action(&self) -> Option<&str> {
        match self {
            Self::InvalidEndpoint { .. } => None,
            Self::Unreachable { action, .. }
            | Self::Status { action, .. }
            | Self::MalformedBody { action, .. } => Some(action),
        }
    }
}
