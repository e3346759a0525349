//! Backend events and user-facing error wording for the console.

use form_core::{LoadError, LoadTicket, TriggerError, TriggerOutcome};
use shared::domain::UiSpec;

pub enum UiEvent {
    Info(String),
    ComponentLoaded {
        ticket: LoadTicket,
        spec: UiSpec,
    },
    ComponentLoadFailed {
        ticket: LoadTicket,
        error: LoadError,
    },
    TriggerResolved {
        field: String,
        outcome: TriggerOutcome,
    },
    TriggerFailed {
        field: String,
        error: TriggerError,
    },
    BackendStopped(String),
}

pub fn describe_load_failure(err: &LoadError) -> String {
    match err {
        LoadError::Unreachable { .. } => {
            "Component server unreachable; check the server URL/network and retry.".to_string()
        }
        LoadError::Status {
            component_id,
            status: 404,
            ..
        } => format!("Component {component_id} does not exist on this server."),
        LoadError::Status { .. } => format!("Component server error: {err}"),
        LoadError::MalformedBody { component_id, .. } => {
            format!("Component {component_id} returned a form this client cannot read.")
        }
        LoadError::InvalidEndpoint { .. } => format!("Configuration error: {err}"),
    }
}

pub fn describe_trigger_failure(field: &str, err: &TriggerError) -> String {
    match err {
        TriggerError::Unreachable { .. } => {
            format!("{field}: action server unreachable; the form was left unchanged.")
        }
        TriggerError::Status {
            api_error: Some(api_error),
            ..
        } => format!("{field}: {}", api_error.description),
        TriggerError::Status { status, .. } => {
            format!("{field}: action failed with status {status}.")
        }
        TriggerError::MalformedBody { .. } | TriggerError::InvalidEndpoint { .. } => {
            format!("{field}: {err}")
        }
    }
}
