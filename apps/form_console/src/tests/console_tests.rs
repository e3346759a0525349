use super::*;
use std::{sync::Arc, thread};

use crossbeam_channel::{bounded, unbounded};
use form_core::{
    LoadError, LoadFailurePolicy, SelectionState, TriggerDispatcher, TriggerEndpoint,
    TriggerError, TriggerOutcome,
};
use serde_json::json;

type LoadFn = dyn Fn(&ComponentId) -> Result<UiSpec, LoadError> + Send;
type TriggerFn = dyn Fn(&TriggerEvent) -> Result<TriggerOutcome, TriggerError> + Send;

fn fake_backend(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    load: Box<LoadFn>,
    trigger: Box<TriggerFn>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            let event = match cmd {
                BackendCommand::LoadComponent {
                    ticket,
                    component_id,
                } => match load(&component_id) {
                    Ok(spec) => UiEvent::ComponentLoaded { ticket, spec },
                    Err(error) => UiEvent::ComponentLoadFailed { ticket, error },
                },
                BackendCommand::FireTrigger { event } => match trigger(&event) {
                    Ok(outcome) => UiEvent::TriggerResolved {
                        field: event.field,
                        outcome,
                    },
                    Err(error) => UiEvent::TriggerFailed {
                        field: event.field,
                        error,
                    },
                },
            };
            if ui_tx.send(event).is_err() {
                break;
            }
        }
    })
}

fn demo_spec() -> UiSpec {
    UiSpec {
        properties: json!({"configuration": {"url": "http://x", "port": 80}}),
        ui_schema: json!([
            {"key": "configuration", "triggers": [
                {"action": "defaults", "family": "demo", "type": "update"}
            ]},
            {"key": "configuration.url", "triggers": [
                {"action": "checkUrl", "family": "demo", "type": "validation",
                 "parameters": [{"key": "value", "path": "configuration.url"}]}
            ]}
        ]),
        ..UiSpec::default()
    }
}

fn load_demo(_: &ComponentId) -> Result<UiSpec, LoadError> {
    Ok(demo_spec())
}

fn never_trigger(_: &TriggerEvent) -> Result<TriggerOutcome, TriggerError> {
    unreachable!("no triggers expected")
}

fn run_console(
    policy: LoadFailurePolicy,
    plan: Plan,
    load: Box<LoadFn>,
    trigger: Box<TriggerFn>,
) -> (Result<()>, DetailSession, String) {
    let (cmd_tx, cmd_rx) = bounded(8);
    let (ui_tx, ui_rx) = unbounded();
    let (action_tx, action_rx) = unbounded();
    let dispatcher = TriggerDispatcher::new(
        TriggerEndpoint::parse("http://127.0.0.1:9/action").expect("endpoint"),
    );
    let bindings = FormBindings::new(action_tx, Arc::new(dispatcher));
    let backend = fake_backend(cmd_rx, ui_tx, load, trigger);

    let mut console = Console::new(
        DetailSession::new(policy),
        bindings,
        action_rx,
        cmd_tx,
        plan,
        Vec::new(),
    );
    let result = console.run(ComponentId::new("demo"), &ui_rx);
    let session_state = std::mem::take(&mut console.session);
    let output = String::from_utf8(std::mem::take(&mut console.out)).expect("utf8");
    drop(console);
    drop(ui_rx);
    backend.join().expect("backend");
    (result, session_state, output)
}

#[test]
fn triggers_then_submit_then_back_to_edit() {
    let plan = Plan {
        triggers: vec!["configuration".into(), "configuration.url".into()],
        submit: true,
        properties: None,
        back_to_edit: true,
    };
    let (result, session, output) = run_console(
        LoadFailurePolicy::StayLoading,
        plan,
        Box::new(load_demo),
        Box::new(|event: &TriggerEvent| -> Result<TriggerOutcome, TriggerError> {
            Ok(match event.trigger.action.as_str() {
                "defaults" => TriggerOutcome::Update {
                    field: event.field.clone(),
                    values: json!({"port": 443}).as_object().cloned().unwrap_or_default(),
                },
                _ => TriggerOutcome::Validation {
                    field: event.field.clone(),
                    status: shared::protocol::CheckStatus::Ok,
                    comment: None,
                },
            })
        }),
    );

    result.expect("console run");
    assert!(output.contains("Loading..."));
    assert!(output.contains("[Back to form]"));
    assert!(output.contains("\"port\": 443"));
    let state = session.state();
    assert!(!state.submitted);
    assert_eq!(
        state.ui_spec.as_ref().map(|spec| &spec.properties),
        Some(&json!({"configuration": {"url": "http://x", "port": 443}}))
    );
}

#[test]
fn explicit_properties_override_working_copy() {
    let plan = Plan {
        triggers: Vec::new(),
        submit: true,
        properties: Some(json!({"a": 2})),
        back_to_edit: false,
    };
    let (result, session, _output) = run_console(
        LoadFailurePolicy::StayLoading,
        plan,
        Box::new(load_demo),
        Box::new(never_trigger),
    );

    result.expect("console run");
    assert!(matches!(
        session.state().selection_state(),
        SelectionState::Submitted(spec) if spec.properties == json!({"a": 2})
    ));
}

#[test]
fn trigger_failure_keeps_committed_state() {
    let plan = Plan {
        triggers: vec!["configuration.url".into()],
        submit: false,
        properties: None,
        back_to_edit: false,
    };
    let (result, session, output) = run_console(
        LoadFailurePolicy::StayLoading,
        plan,
        Box::new(load_demo),
        Box::new(|event: &TriggerEvent| -> Result<TriggerOutcome, TriggerError> {
            Err(TriggerError::Status {
                action: event.trigger.action.clone(),
                status: 500,
                api_error: None,
            })
        }),
    );

    result.expect("console run");
    assert!(output.contains("configuration.url: action failed with status 500."));
    assert_eq!(session.state().ui_spec, Some(demo_spec()));
    assert!(!session.state().submitted);
}

#[test]
fn update_on_scalar_field_leaves_submitted_values_intact() {
    let plan = Plan {
        triggers: vec!["configuration.url".into()],
        submit: true,
        properties: None,
        back_to_edit: false,
    };
    let (result, session, output) = run_console(
        LoadFailurePolicy::StayLoading,
        plan,
        Box::new(load_demo),
        Box::new(|event: &TriggerEvent| -> Result<TriggerOutcome, TriggerError> {
            Ok(TriggerOutcome::Update {
                field: event.field.clone(),
                values: json!({"host": "y"}).as_object().cloned().unwrap_or_default(),
            })
        }),
    );

    result.expect("console run");
    assert!(output.contains("configuration.url: outcome not applied"));
    assert!(matches!(
        session.state().selection_state(),
        SelectionState::Submitted(spec) if spec.properties == demo_spec().properties
    ));
}

#[test]
fn load_failure_follows_reset_policy() {
    let (result, session, output) = run_console(
        LoadFailurePolicy::ResetSelection,
        Plan::default(),
        Box::new(|id: &ComponentId| -> Result<UiSpec, LoadError> {
            Err(LoadError::Status {
                component_id: id.clone(),
                status: 404,
                api_error: None,
            })
        }),
        Box::new(never_trigger),
    );

    assert!(result.is_err());
    assert!(output.contains("Component demo does not exist on this server."));
    assert!(output.ends_with(
        "# No component selected\nClick on a component to see its form\n---\n"
    ));
    assert_eq!(session.state().selection_state(), SelectionState::NoSelection);
}
