//! Plain-text rendering of the detail view.

use std::io::{self, Write};

use form_core::{
    declared_triggers,
    view::{NO_SELECTION_HINT, NO_SELECTION_TITLE},
    DetailView,
};
use serde_json::Value;
use shared::domain::UiSpec;

pub fn render_view(view: &DetailView<'_>, out: &mut impl Write) -> io::Result<()> {
    match view {
        DetailView::Loading => writeln!(out, "Loading..."),
        DetailView::NoSelection => {
            writeln!(out, "# {NO_SELECTION_TITLE}")?;
            writeln!(out, "{NO_SELECTION_HINT}")
        }
        DetailView::Submitted { properties_json } => {
            writeln!(out, "{properties_json}")?;
            writeln!(out, "[Back to form]")
        }
        DetailView::Form(spec) => render_form(spec, out),
    }
}

/// Lists the current values, any field errors, and the triggers each field
/// declares.
pub fn render_form(spec: &UiSpec, out: &mut impl Write) -> io::Result<()> {
    let mut fields = Vec::new();
    collect_leaves(&spec.properties, String::new(), &mut fields);
    for (path, value) in &fields {
        write!(out, "{path} = {value}")?;
        if let Some(error) = spec.field_error(path) {
            write!(out, "  ! {error}")?;
        }
        let triggers = declared_triggers(spec, path);
        if !triggers.is_empty() {
            let kinds: Vec<&str> = triggers.iter().map(|t| t.kind.as_str()).collect();
            write!(out, "  [{}]", kinds.join(", "))?;
        }
        writeln!(out)?;
    }
    writeln!(out, "[Submit]")
}

fn collect_leaves(value: &Value, prefix: String, fields: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect_leaves(child, path, fields);
            }
        }
        Value::Null if prefix.is_empty() => {}
        other => fields.push((prefix, other.to_string())),
    }
}
