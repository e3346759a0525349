//! Remote trigger dispatch for field-level form behavior.
//!
//! A trigger is declared on a ui schema element and fired by the renderer
//! (validation on blur, dynamic values when a list opens, ...). The
//! dispatcher posts it to the configured action endpoint and decodes the
//! response into a [`TriggerOutcome`] that the renderer applies to its own
//! working copy of the [`UiSpec`](shared::domain::UiSpec).

use reqwest::Client;
use serde_json::{Map, Value};
use shared::{
    domain::{lookup, UiSpec},
    error::{ApiError, PropertyPathError},
    protocol::{
        CheckStatus, HealthCheckResponse, TriggerDefinition, TriggerKind, ValidationResponse,
        ValueItem, ValuesResponse,
    },
};
use tracing::{debug, warn};
use url::Url;

use crate::error::TriggerError;

const DEFAULT_VALIDATION_MESSAGE: &str = "invalid value";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEndpoint(Url);

impl TriggerEndpoint {
    pub fn parse(raw: &str) -> Result<Self, TriggerError> {
        Url::parse(raw)
            .map(Self)
            .map_err(|source| TriggerError::InvalidEndpoint {
                url: raw.to_string(),
                source,
            })
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    fn request_url(&self, trigger: &TriggerDefinition) -> Url {
        let mut url = self.0.clone();
        url.query_pairs_mut()
            .append_pair("action", &trigger.action)
            .append_pair("family", &trigger.family)
            .append_pair("type", trigger.kind.as_str());
        url
    }
}

impl From<Url> for TriggerEndpoint {
    fn from(value: Url) -> Self {
        Self(value)
    }
}

/// Triggers declared under `triggers` on the ui schema element for `field`.
/// Entries that do not decode are skipped.
pub fn declared_triggers(spec: &UiSpec, field: &str) -> Vec<TriggerDefinition> {
    let Some(Value::Array(triggers)) = spec
        .ui_schema_element(field)
        .and_then(|element| element.get("triggers"))
    else {
        return Vec::new();
    };
    triggers
        .iter()
        .filter_map(|raw| match serde_json::from_value(raw.clone()) {
            Ok(trigger) => Some(trigger),
            Err(err) => {
                warn!(field = %field, %err, "skipping undecodable trigger declaration");
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriggerEvent {
    /// Property path of the field that fired.
    pub field: String,
    pub trigger: TriggerDefinition,
    /// The renderer's current `properties`.
    pub payload: Value,
}

impl TriggerEvent {
    /// Body sent to the action endpoint: each parameter key bound to the
    /// payload value at its path. Unresolved paths are left out.
    pub fn request_body(&self) -> Map<String, Value> {
        self.trigger
            .parameters
            .iter()
            .filter_map(|param| {
                lookup(&self.payload, &param.path).map(|value| (param.key.clone(), value.clone()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    Validation {
        field: String,
        status: CheckStatus,
        comment: Option<String>,
    },
    DynamicValues {
        field: String,
        items: Vec<ValueItem>,
    },
    Healthcheck {
        status: CheckStatus,
        comment: Option<String>,
    },
    Update {
        field: String,
        values: Map<String, Value>,
    },
    Fragment {
        kind: String,
        body: Value,
    },
}

impl TriggerOutcome {
    fn decode(event: &TriggerEvent, body: &[u8]) -> Result<Self, TriggerError> {
        let malformed = |reason: String| TriggerError::MalformedBody {
            action: event.trigger.action.clone(),
            reason,
        };
        let field = event.field.clone();

        let outcome = match &event.trigger.kind {
            TriggerKind::Validation => {
                let res: ValidationResponse =
                    serde_json::from_slice(body).map_err(|e| malformed(e.to_string()))?;
                Self::Validation {
                    field,
                    status: res.status,
                    comment: res.comment,
                }
            }
            TriggerKind::DynamicValues => {
                let res: ValuesResponse =
                    serde_json::from_slice(body).map_err(|e| malformed(e.to_string()))?;
                Self::DynamicValues {
                    field,
                    items: res.items,
                }
            }
            TriggerKind::Healthcheck => {
                let res: HealthCheckResponse =
                    serde_json::from_slice(body).map_err(|e| malformed(e.to_string()))?;
                Self::Healthcheck {
                    status: res.status,
                    comment: res.comment,
                }
            }
            TriggerKind::Update => {
                match serde_json::from_slice::<Value>(body).map_err(|e| malformed(e.to_string()))? {
                    Value::Object(values) => Self::Update { field, values },
                    other => {
                        return Err(malformed(format!(
                            "update response must be an object, got {other}"
                        )))
                    }
                }
            }
            TriggerKind::Other(kind) => Self::Fragment {
                kind: kind.clone(),
                body: serde_json::from_slice(body).map_err(|e| malformed(e.to_string()))?,
            },
        };
        Ok(outcome)
    }

    /// Applies the outcome to a renderer working copy. Returns whether the
    /// working copy changed; an `update` that cannot be merged leaves it as is.
    pub fn apply_to(&self, spec: &mut UiSpec) -> Result<bool, PropertyPathError> {
        let changed = match self {
            Self::Validation {
                field,
                status: CheckStatus::Ok,
                ..
            } => spec.clear_field_error(field),
            Self::Validation {
                field,
                status: CheckStatus::Ko,
                comment,
            } => {
                let message = comment.as_deref().unwrap_or(DEFAULT_VALIDATION_MESSAGE);
                spec.set_field_error(field, message);
                true
            }
            Self::DynamicValues { field, items } => {
                let Some(element) = spec.ui_schema_element_mut(field) else {
                    warn!(field = %field, "no ui schema element for dynamic values");
                    return Ok(false);
                };
                let title_map = items
                    .iter()
                    .map(|item| {
                        serde_json::json!({
                            "name": item.label.as_deref().unwrap_or(&item.id),
                            "value": &item.id,
                        })
                    })
                    .collect();
                element.insert("titleMap".to_string(), Value::Array(title_map));
                true
            }
            Self::Update { field, values } => {
                spec.merge_properties_at(field, values.clone())?;
                true
            }
            Self::Healthcheck { .. } | Self::Fragment { .. } => false,
        };
        Ok(changed)
    }
}

/// Sends trigger events to a single action endpoint fixed at construction.
#[derive(Debug, Clone)]
pub struct TriggerDispatcher {
    http: Client,
    endpoint: TriggerEndpoint,
}

impl TriggerDispatcher {
    pub fn new(endpoint: TriggerEndpoint) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: TriggerEndpoint) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &TriggerEndpoint {
        &self.endpoint
    }

    /// One attempt per event; retry policy is left to the caller.
    pub async fn dispatch(&self, event: &TriggerEvent) -> Result<TriggerOutcome, TriggerError> {
        let action = event.trigger.action.clone();
        let url = self.endpoint.request_url(&event.trigger);
        debug!(
            action = %action,
            kind = %event.trigger.kind,
            field = %event.field,
            "dispatching trigger"
        );

        let unreachable = |source| TriggerError::Unreachable {
            action: action.clone(),
            source,
        };
        let response = self
            .http
            .post(url)
            .json(&event.request_body())
            .send()
            .await
            .map_err(unreachable)?;
        let status = response.status();
        let body = response.bytes().await.map_err(unreachable)?;

        if !status.is_success() {
            let api_error = serde_json::from_slice::<ApiError>(&body).ok();
            warn!(action = %action, status = status.as_u16(), "trigger rejected");
            return Err(TriggerError::Status {
                action,
                status: status.as_u16(),
                api_error,
            });
        }

        TriggerOutcome::decode(event, &body)
    }
}

#[cfg(test)]
#[path = "tests/trigger_tests.rs"]
mod tests;
