//! Selection of the detail view and the callbacks handed to the form renderer.

use std::sync::Arc;

use crossbeam_channel::Sender;
use futures::{future::BoxFuture, FutureExt};
use serde_json::Value;
use shared::domain::UiSpec;
use thiserror::Error;

use crate::{
    error::TriggerError,
    store::{DetailAction, DetailState, SelectionState},
    trigger::{TriggerDispatcher, TriggerEvent, TriggerOutcome},
};

pub const NO_SELECTION_TITLE: &str = "No component selected";
pub const NO_SELECTION_HINT: &str = "Click on a component to see its form";

#[derive(Debug, Clone, PartialEq)]
pub enum DetailView<'a> {
    Loading,
    NoSelection,
    /// Read-only result; `properties_json` is the submitted properties
    /// pretty-printed with two-space indentation.
    Submitted { properties_json: String },
    Form(&'a UiSpec),
}

/// Picks the single view for `state`. Loading wins over everything, then the
/// presence of a specification, then the submitted flag.
pub fn select_view(state: &DetailState) -> DetailView<'_> {
    match state.selection_state() {
        SelectionState::Loading => DetailView::Loading,
        SelectionState::NoSelection => DetailView::NoSelection,
        SelectionState::Submitted(spec) => DetailView::Submitted {
            properties_json: serde_json::to_string_pretty(&spec.properties)
                .unwrap_or_else(|_| spec.properties.to_string()),
        },
        SelectionState::Ready(spec) => DetailView::Form(spec),
    }
}

#[derive(Debug, Error)]
#[error("detail view is gone; {action} was not delivered")]
pub struct ViewClosed {
    pub action: &'static str,
}

/// Callbacks wired into the form renderer while the live form is shown.
///
/// Triggers go straight to the dispatcher and only ever affect the
/// renderer's working copy. Submissions and the back-to-edit control are
/// queued as [`DetailAction`]s for the owner of the detail state.
#[derive(Clone)]
pub struct FormBindings {
    actions: Sender<DetailAction>,
    dispatcher: Arc<TriggerDispatcher>,
}

impl FormBindings {
    pub fn new(actions: Sender<DetailAction>, dispatcher: Arc<TriggerDispatcher>) -> Self {
        Self {
            actions,
            dispatcher,
        }
    }

    pub fn on_trigger(
        &self,
        event: TriggerEvent,
    ) -> BoxFuture<'static, Result<TriggerOutcome, TriggerError>> {
        let dispatcher = Arc::clone(&self.dispatcher);
        async move { dispatcher.dispatch(&event).await }.boxed()
    }

    pub fn on_submit(&self, properties: Value) -> Result<(), ViewClosed> {
        self.send(DetailAction::Submit(properties))
    }

    pub fn on_back_to_edit(&self) -> Result<(), ViewClosed> {
        self.send(DetailAction::BackToEdit)
    }

    fn send(&self, action: DetailAction) -> Result<(), ViewClosed> {
        let name = action.name();
        self.actions.send(action).map_err(|_| {
            tracing::warn!(action = name, "detail action receiver dropped");
            ViewClosed { action: name }
        })?;
        tracing::debug!(action = name, "queued detail action");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
