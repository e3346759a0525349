use super::*;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::store::SelectionState;

fn spec_with(properties: Value) -> UiSpec {
    UiSpec {
        properties,
        ..UiSpec::default()
    }
}

struct StaticSpecSource {
    specs: HashMap<ComponentId, UiSpec>,
}

#[async_trait]
impl ComponentSpecSource for StaticSpecSource {
    async fn fetch_component_spec(&self, id: &ComponentId) -> Result<UiSpec, LoadError> {
        self.specs.get(id).cloned().ok_or_else(|| LoadError::Status {
            component_id: id.clone(),
            status: 404,
            api_error: None,
        })
    }
}

fn not_found(id: &str) -> LoadError {
    LoadError::Status {
        component_id: ComponentId::new(id),
        status: 404,
        api_error: None,
    }
}

#[test]
fn stale_completion_is_discarded() {
    let mut session = DetailSession::default();
    let first = session.begin_load(ComponentId::new("a"));
    let second = session.begin_load(ComponentId::new("b"));

    assert!(!session.complete_load(first, spec_with(json!({"from": "a"}))));
    assert_eq!(session.state().selection_state(), SelectionState::Loading);

    assert!(session.complete_load(second, spec_with(json!({"from": "b"}))));
    assert_eq!(
        session.state().ui_spec,
        Some(spec_with(json!({"from": "b"})))
    );
    assert_eq!(session.selected(), Some(&ComponentId::new("b")));
}

#[test]
fn late_completion_after_newer_one_does_not_overwrite() {
    let mut session = DetailSession::default();
    let first = session.begin_load(ComponentId::new("a"));
    let second = session.begin_load(ComponentId::new("a"));
    assert!(session.complete_load(second, spec_with(json!({"v": 2}))));
    assert!(!session.complete_load(first, spec_with(json!({"v": 1}))));
    assert_eq!(session.state().ui_spec, Some(spec_with(json!({"v": 2}))));
}

#[test]
fn selecting_another_component_drops_previous_state() {
    let mut session = DetailSession::default();
    let ticket = session.begin_load(ComponentId::new("a"));
    session.complete_load(ticket, spec_with(json!({"a": 1})));
    session.dispatch(DetailAction::Submit(json!({"a": 2})));

    session.begin_load(ComponentId::new("b"));

    assert_eq!(
        session.state(),
        &DetailState {
            is_loading: true,
            ui_spec: None,
            submitted: false,
        }
    );
}

#[test]
fn reloading_same_component_keeps_state_until_detail_lands() {
    let mut session = DetailSession::default();
    let ticket = session.begin_load(ComponentId::new("a"));
    session.complete_load(ticket, spec_with(json!({"a": 1})));

    session.begin_load(ComponentId::new("a"));

    assert!(session.state().is_loading);
    assert_eq!(session.state().ui_spec, Some(spec_with(json!({"a": 1}))));
}

#[test]
fn failure_with_stay_loading_policy_keeps_indicator() {
    let mut session = DetailSession::new(LoadFailurePolicy::StayLoading);
    let ticket = session.begin_load(ComponentId::new("a"));

    assert!(session.fail_load(ticket, &not_found("a")));
    assert_eq!(session.state().selection_state(), SelectionState::Loading);
}

#[test]
fn failure_with_reset_policy_returns_to_no_selection() {
    let mut session = DetailSession::new(LoadFailurePolicy::ResetSelection);
    let ticket = session.begin_load(ComponentId::new("a"));

    assert!(session.fail_load(ticket, &not_found("a")));
    assert_eq!(session.state().selection_state(), SelectionState::NoSelection);
    assert_eq!(session.selected(), None);
}

#[test]
fn stale_failure_is_ignored() {
    let mut session = DetailSession::new(LoadFailurePolicy::ResetSelection);
    let stale = session.begin_load(ComponentId::new("a"));
    let current = session.begin_load(ComponentId::new("b"));
    session.complete_load(current, spec_with(json!({"b": 1})));

    assert!(!session.fail_load(stale, &not_found("a")));
    assert!(matches!(
        session.state().selection_state(),
        SelectionState::Ready(_)
    ));
}

#[tokio::test]
async fn load_from_source_runs_full_cycle() {
    let source = StaticSpecSource {
        specs: HashMap::from([(ComponentId::new("a"), spec_with(json!({"a": 1})))]),
    };
    let mut session = DetailSession::new(LoadFailurePolicy::ResetSelection);

    session
        .load(&source, ComponentId::new("a"))
        .await
        .expect("load");
    assert_eq!(
        session.state(),
        &DetailState {
            is_loading: false,
            ui_spec: Some(spec_with(json!({"a": 1}))),
            submitted: false,
        }
    );

    let err = session
        .load(&source, ComponentId::new("zzz"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, LoadError::Status { status: 404, .. }));
    assert_eq!(session.state(), &DetailState::default());
}

#[test]
fn clear_tears_down_selection() {
    let mut session = DetailSession::default();
    let ticket = session.begin_load(ComponentId::new("a"));
    session.clear();
    assert!(!session.complete_load(ticket, spec_with(json!({}))));
    assert_eq!(session.state(), &DetailState::default());
}
