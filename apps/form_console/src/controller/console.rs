//! Console loop: owns the detail session and plays the form renderer's role.

use std::io::Write;

use anyhow::{anyhow, bail, Context, Result};
use crossbeam_channel::{Receiver, Sender};
use form_core::{
    declared_triggers, select_view, DetailAction, DetailSession, FormBindings, TriggerEvent,
};
use serde_json::Value;
use shared::domain::{ComponentId, UiSpec};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{describe_load_failure, describe_trigger_failure, UiEvent},
        orchestration::dispatch_backend_command,
    },
    render::render_view,
};

/// What to do once the form is shown.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub triggers: Vec<String>,
    pub submit: bool,
    /// Submitted instead of the working copy's properties.
    pub properties: Option<Value>,
    pub back_to_edit: bool,
}

pub struct Console<W: Write> {
    session: DetailSession,
    bindings: FormBindings,
    actions: Receiver<DetailAction>,
    cmd_tx: Sender<BackendCommand>,
    /// Renderer-local copy that trigger outcomes are applied to.
    working: Option<UiSpec>,
    pending_triggers: usize,
    plan: Plan,
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(
        session: DetailSession,
        bindings: FormBindings,
        actions: Receiver<DetailAction>,
        cmd_tx: Sender<BackendCommand>,
        plan: Plan,
        out: W,
    ) -> Self {
        Self {
            session,
            bindings,
            actions,
            cmd_tx,
            working: None,
            pending_triggers: 0,
            plan,
            out,
        }
    }

    pub fn run(&mut self, component_id: ComponentId, events: &Receiver<UiEvent>) -> Result<()> {
        self.render()?;
        let ticket = self.session.begin_load(component_id.clone());
        self.render()?;
        self.send(BackendCommand::LoadComponent {
            ticket,
            component_id,
        })?;

        for event in events.iter() {
            match event {
                UiEvent::Info(message) => tracing::info!("{message}"),
                UiEvent::BackendStopped(reason) => bail!("{reason}"),
                UiEvent::ComponentLoaded { ticket, spec } => {
                    if !self.session.complete_load(ticket, spec) {
                        continue;
                    }
                    self.working = self.session.state().ui_spec.clone();
                    self.render()?;
                    self.fire_planned_triggers()?;
                    if self.pending_triggers == 0 {
                        return self.finish();
                    }
                }
                UiEvent::ComponentLoadFailed { ticket, error } => {
                    if !self.session.fail_load(ticket, &error) {
                        continue;
                    }
                    writeln!(self.out, "{}", describe_load_failure(&error))?;
                    self.render()?;
                    return Err(anyhow!(error).context("component load failed"));
                }
                UiEvent::TriggerResolved { field, outcome } => {
                    writeln!(self.out, "{field}: {outcome:?}")?;
                    if let Some(working) = self.working.as_mut() {
                        match outcome.apply_to(working) {
                            Ok(true) => tracing::debug!(field = %field, "trigger outcome applied"),
                            Ok(false) => {}
                            Err(err) => {
                                tracing::warn!(field = %field, %err, "trigger outcome not applied");
                                writeln!(self.out, "{field}: outcome not applied: {err}")?;
                            }
                        }
                    }
                    if self.trigger_settled() {
                        return self.finish();
                    }
                }
                UiEvent::TriggerFailed { field, error } => {
                    writeln!(self.out, "{}", describe_trigger_failure(&field, &error))?;
                    if self.trigger_settled() {
                        return self.finish();
                    }
                }
            }
        }

        bail!("backend worker stopped before the form was settled")
    }

    fn trigger_settled(&mut self) -> bool {
        self.pending_triggers = self.pending_triggers.saturating_sub(1);
        self.pending_triggers == 0
    }

    fn fire_planned_triggers(&mut self) -> Result<()> {
        let Some(working) = self.working.as_ref() else {
            return Ok(());
        };
        let mut events = Vec::new();
        for field in &self.plan.triggers {
            let triggers = declared_triggers(working, field);
            if triggers.is_empty() {
                writeln!(self.out, "{field}: no triggers declared")?;
            }
            events.extend(triggers.into_iter().map(|trigger| TriggerEvent {
                field: field.clone(),
                trigger,
                payload: working.properties.clone(),
            }));
        }
        for event in events {
            self.send(BackendCommand::FireTrigger { event })?;
            self.pending_triggers += 1;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if !self.plan.submit {
            return Ok(());
        }
        let properties = match (self.plan.properties.take(), self.working.as_ref()) {
            (Some(properties), _) => properties,
            (None, Some(working)) => working.properties.clone(),
            (None, None) => bail!("nothing to submit: no form is loaded"),
        };
        self.bindings
            .on_submit(properties)
            .context("failed to submit form")?;
        self.session.drain(&self.actions);
        self.render()?;

        if self.plan.back_to_edit {
            self.bindings
                .on_back_to_edit()
                .context("failed to return to the form")?;
            self.session.drain(&self.actions);
            self.working = self.session.state().ui_spec.clone();
            self.render()?;
        }
        Ok(())
    }

    fn send(&self, cmd: BackendCommand) -> Result<()> {
        dispatch_backend_command(&self.cmd_tx, cmd)
    }

    fn render(&mut self) -> Result<()> {
        let view = select_view(self.session.state());
        render_view(&view, &mut self.out)?;
        writeln!(self.out, "---")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/console_tests.rs"]
mod tests;
