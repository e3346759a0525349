//! Owner of the detail state for the currently displayed component.

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use shared::domain::{ComponentId, UiSpec};
use tracing::{debug, info, warn};

use crate::{
    error::LoadError,
    fetch::ComponentSpecSource,
    store::{reduce, DetailAction, DetailState},
};

/// Identifies one load request. Completions carrying an older ticket are
/// stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// What the view shows after a failed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadFailurePolicy {
    #[default]
    StayLoading,
    ResetSelection,
}

#[derive(Debug, Default)]
pub struct DetailSession {
    state: DetailState,
    current: Option<(ComponentId, LoadTicket)>,
    next_ticket: u64,
    failure_policy: LoadFailurePolicy,
}

impl DetailSession {
    pub fn new(failure_policy: LoadFailurePolicy) -> Self {
        Self {
            failure_policy,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn selected(&self) -> Option<&ComponentId> {
        self.current.as_ref().map(|(id, _)| id)
    }

    pub fn dispatch(&mut self, action: DetailAction) {
        self.state = reduce(&self.state, action);
    }

    /// Applies every action queued by form bindings. Returns how many were
    /// applied.
    pub fn drain(&mut self, actions: &Receiver<DetailAction>) -> usize {
        let mut applied = 0;
        while let Ok(action) = actions.try_recv() {
            self.dispatch(action);
            applied += 1;
        }
        applied
    }

    /// Starts loading `id`. Selecting a different component discards the
    /// previous one's state first; reloading the same one keeps it until the
    /// new detail lands.
    pub fn begin_load(&mut self, id: ComponentId) -> LoadTicket {
        if self.selected().is_some_and(|current| *current != id) {
            self.state = DetailState::default();
        }
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        debug!(component_id = %id, ticket = ticket.0, "component load started");
        self.current = Some((id, ticket));
        self.dispatch(DetailAction::LoadStart);
        ticket
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        self.current
            .as_ref()
            .is_some_and(|(_, current)| *current == ticket)
    }

    /// Returns false when the completion is stale and was ignored.
    pub fn complete_load(&mut self, ticket: LoadTicket, spec: UiSpec) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, "dropping stale component load");
            return false;
        }
        self.dispatch(DetailAction::LoadComplete(spec));
        true
    }

    /// Returns false when the failure is stale and was ignored.
    pub fn fail_load(&mut self, ticket: LoadTicket, err: &LoadError) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, "dropping stale component load failure");
            return false;
        }
        warn!(ticket = ticket.0, policy = ?self.failure_policy, %err, "component load failed");
        if self.failure_policy == LoadFailurePolicy::ResetSelection {
            self.clear();
        }
        true
    }

    /// Drops the selection, as when the view is torn down.
    pub fn clear(&mut self) {
        self.current = None;
        self.state = DetailState::default();
    }

    pub async fn load<S>(&mut self, source: &S, id: ComponentId) -> Result<(), LoadError>
    where
        S: ComponentSpecSource + ?Sized,
    {
        let ticket = self.begin_load(id.clone());
        match source.fetch_component_spec(&id).await {
            Ok(spec) => {
                if self.complete_load(ticket, spec) {
                    info!(component_id = %id, "component ready");
                }
                Ok(())
            }
            Err(err) => {
                self.fail_load(ticket, &err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
