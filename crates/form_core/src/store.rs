//! Detail state for the selected component and its reducer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::domain::UiSpec;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailState {
    pub is_loading: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_spec: Option<UiSpec>,
    pub submitted: bool,
}

/// Phase of the detail view, derived from [`DetailState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionState<'a> {
    NoSelection,
    Loading,
    Ready(&'a UiSpec),
    Submitted(&'a UiSpec),
}

impl DetailState {
    pub fn selection_state(&self) -> SelectionState<'_> {
        if self.is_loading {
            return SelectionState::Loading;
        }
        match &self.ui_spec {
            None => SelectionState::NoSelection,
            Some(spec) if self.submitted => SelectionState::Submitted(spec),
            Some(spec) => SelectionState::Ready(spec),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum DetailAction {
    LoadStart,
    LoadComplete(UiSpec),
    Submit(Value),
    BackToEdit,
}

impl DetailAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadStart => "load_start",
            Self::LoadComplete(_) => "load_complete",
            Self::Submit(_) => "submit",
            Self::BackToEdit => "back_to_edit",
        }
    }

    /// Reports actions the reducer would ignore because the state cannot
    /// support them.
    pub fn validate_against(&self, state: &DetailState) -> Result<(), InvalidTransition> {
        match self {
            Self::Submit(_) if state.ui_spec.is_none() => Err(InvalidTransition::SubmitWithoutSpec),
            Self::Submit(_) if state.is_loading => Err(InvalidTransition::SubmitWhileLoading),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidTransition {
    #[error("submit dispatched with no component specification loaded")]
    SubmitWithoutSpec,
    /// The held specification is stale until the pending load completes.
    #[error("submit dispatched while the component specification is loading")]
    SubmitWhileLoading,
}

pub fn reduce(state: &DetailState, action: DetailAction) -> DetailState {
    if let Err(err) = action.validate_against(state) {
        warn!(action = action.name(), %err, "ignoring invalid detail transition");
        return state.clone();
    }
    debug!(action = action.name(), "reducing detail action");

    match action {
        DetailAction::LoadStart => DetailState {
            is_loading: true,
            ..state.clone()
        },
        DetailAction::LoadComplete(spec) => DetailState {
            is_loading: false,
            ui_spec: Some(spec),
            submitted: false,
        },
        DetailAction::Submit(properties) => DetailState {
            ui_spec: state
                .ui_spec
                .as_ref()
                .map(|spec| spec.with_properties(properties)),
            submitted: true,
            ..state.clone()
        },
        DetailAction::BackToEdit => DetailState {
            submitted: false,
            ..state.clone()
        },
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
