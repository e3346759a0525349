use std::{fs, io, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::{bounded, unbounded};
use form_core::{
    config::load_settings, DetailSession, FormBindings, HttpComponentSpecSource,
    TriggerDispatcher,
};
use shared::domain::ComponentId;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod render;

use controller::console::{Console, Plan};

const COMMAND_QUEUE_DEPTH: usize = 64;

/// Opens a component form, fires field triggers, and optionally submits it.
#[derive(Parser, Debug)]
struct Args {
    /// Identifier of the component to open.
    component_id: String,
    /// Overrides the configured component server.
    #[arg(long)]
    server_url: Option<String>,
    /// Fires the triggers declared on FIELD once the form is shown.
    #[arg(long = "trigger", value_name = "FIELD")]
    triggers: Vec<String>,
    #[arg(long)]
    submit: bool,
    /// JSON file with the properties to submit instead of the form's values.
    #[arg(long, value_name = "FILE", requires = "submit")]
    properties: Option<PathBuf>,
    /// Returns to the form after the submitted result is shown.
    #[arg(long, requires = "submit")]
    back_to_edit: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    tracing::info!(server_url = %settings.server_url, "using component server");

    let properties: Option<serde_json::Value> = match &args.properties {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read properties file '{}'", path.display()))?;
            Some(serde_json::from_str(&raw).with_context(|| {
                format!("properties file '{}' is not valid JSON", path.display())
            })?)
        }
        None => None,
    };

    let http = settings
        .http_client()
        .context("failed to build HTTP client")?;
    let detail_endpoint = settings
        .detail_endpoint()
        .context("invalid component detail endpoint")?;
    let trigger_endpoint = settings
        .trigger_endpoint()
        .context("invalid trigger endpoint")?;

    let source = Arc::new(HttpComponentSpecSource::new(http.clone(), detail_endpoint));
    let dispatcher = Arc::new(TriggerDispatcher::with_client(http, trigger_endpoint));
    let (action_tx, action_rx) = unbounded();
    let bindings = FormBindings::new(action_tx, dispatcher);

    let (cmd_tx, cmd_rx) = bounded(COMMAND_QUEUE_DEPTH);
    let (ui_tx, ui_rx) = unbounded();
    let worker = backend_bridge::runtime::launch(cmd_rx, ui_tx, source, bindings.clone());

    let plan = Plan {
        triggers: args.triggers,
        submit: args.submit,
        properties,
        back_to_edit: args.back_to_edit,
    };
    let mut console = Console::new(
        DetailSession::new(settings.load_failure_policy),
        bindings,
        action_rx,
        cmd_tx,
        plan,
        io::stdout(),
    );
    let result = console.run(ComponentId::new(args.component_id), &ui_rx);

    drop(console);
    if worker.join().is_err() {
        tracing::error!("backend worker panicked");
    }
    result
}
