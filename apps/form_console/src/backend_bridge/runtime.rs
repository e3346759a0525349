//! Backend worker: owns the tokio runtime and runs fetches and triggers.

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};
use form_core::{ComponentSpecSource, FormBindings};

use crate::{backend_bridge::commands::BackendCommand, controller::events::UiEvent};

/// Runs until the command queue is closed. Each command runs as its own
/// task, so a slow trigger never holds up a load or another trigger.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    source: Arc<dyn ComponentSpecSource>,
    bindings: FormBindings,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.send(UiEvent::BackendStopped(format!(
                    "backend worker startup failure: {err}"
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.send(UiEvent::Info("Backend worker ready".to_string()));
            let mut tasks = Vec::new();

            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend: received command");
                let ui_tx = ui_tx.clone();
                match cmd {
                    BackendCommand::LoadComponent {
                        ticket,
                        component_id,
                    } => {
                        let source = Arc::clone(&source);
                        tasks.push(tokio::spawn(async move {
                            let event = match source.fetch_component_spec(&component_id).await {
                                Ok(spec) => UiEvent::ComponentLoaded { ticket, spec },
                                Err(error) => UiEvent::ComponentLoadFailed { ticket, error },
                            };
                            let _ = ui_tx.send(event);
                        }));
                    }
                    BackendCommand::FireTrigger { event } => {
                        let field = event.field.clone();
                        let pending = bindings.on_trigger(event);
                        tasks.push(tokio::spawn(async move {
                            let event = match pending.await {
                                Ok(outcome) => UiEvent::TriggerResolved { field, outcome },
                                Err(error) => UiEvent::TriggerFailed { field, error },
                            };
                            let _ = ui_tx.send(event);
                        }));
                    }
                }
                tasks.retain(|task| !task.is_finished());
            }

            for task in tasks {
                let _ = task.await;
            }
            tracing::debug!("backend: command queue closed");
        });
    })
}
