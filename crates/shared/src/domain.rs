use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PropertyPathError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Form document served by the component detail endpoint.
///
/// Only `properties` (current values) and `errors` (per-field messages) are
/// interpreted here; schema documents and any other top-level keys are carried
/// through untouched. Absent (or `null`) documents stay absent on the way out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSpec {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub json_schema: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub ui_schema: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub properties: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UiSpec {
    pub fn with_properties(&self, properties: Value) -> Self {
        Self {
            properties,
            ..self.clone()
        }
    }

    /// Looks up a dotted property path (`configuration.dataset.url`).
    /// Numeric segments index into arrays.
    pub fn property(&self, path: &str) -> Option<&Value> {
        lookup(&self.properties, path)
    }

    /// Merges `values` into the object found at `path`. Numeric segments index
    /// into existing arrays; missing or `null` members become objects. Nothing
    /// is written when the path crosses or ends on any other value.
    pub fn merge_properties_at(
        &mut self,
        path: &str,
        values: Map<String, Value>,
    ) -> Result<(), PropertyPathError> {
        object_at_mut(&mut self.properties, path)?.extend(values);
        Ok(())
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.errors.as_ref()?.get(field)?.as_str()
    }

    /// Records a message for `field`. An `errors` document that is not an
    /// object cannot hold field messages and is replaced.
    pub fn set_field_error(&mut self, field: &str, message: impl Into<String>) {
        let errors = self.errors.get_or_insert_with(|| Value::Object(Map::new()));
        if !errors.is_object() {
            *errors = Value::Object(Map::new());
        }
        if let Value::Object(errors) = errors {
            errors.insert(field.to_string(), Value::String(message.into()));
        }
    }

    pub fn clear_field_error(&mut self, field: &str) -> bool {
        self.errors
            .as_mut()
            .and_then(Value::as_object_mut)
            .is_some_and(|errors| errors.shift_remove(field).is_some())
    }

    /// Finds the ui schema element whose `key` designates `field`. Keys are
    /// either dotted strings or arrays of segments.
    pub fn ui_schema_element(&self, field: &str) -> Option<&Map<String, Value>> {
        find_element_ref(&self.ui_schema, field)
    }

    pub fn ui_schema_element_mut(&mut self, field: &str) -> Option<&mut Map<String, Value>> {
        find_element(&mut self.ui_schema, field)
    }
}

/// Splits a dotted path into its parent path and last segment.
pub fn split_parent(path: &str) -> (&str, &str) {
    match path.rsplit_once('.') {
        Some((parent, leaf)) => (parent, leaf),
        None => ("", path),
    }
}

pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(root);
    }
    path.split('.').try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn object_at_mut<'a>(
    root: &'a mut Value,
    path: &str,
) -> Result<&'a mut Map<String, Value>, PropertyPathError> {
    let conflict = |reason: String| PropertyPathError {
        path: path.to_string(),
        reason,
    };
    let mut current = root;
    for segment in path.split('.').filter(|segment| !segment.is_empty()) {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
            Value::Array(items) => {
                let len = items.len();
                let index = segment.parse::<usize>().map_err(|_| {
                    conflict(format!("segment '{segment}' does not index an array"))
                })?;
                items.get_mut(index).ok_or_else(|| {
                    conflict(format!("index {index} is out of range for {len} items"))
                })?
            }
            other => {
                return Err(conflict(format!(
                    "segment '{segment}' crosses a {}",
                    kind_name(other)
                )))
            }
        };
    }
    if current.is_null() {
        *current = Value::Object(Map::new());
    }
    match current {
        Value::Object(map) => Ok(map),
        other => Err(conflict(format!("target holds a {}", kind_name(other)))),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn key_matches(key: &Value, field: &str) -> bool {
    match key {
        Value::String(key) => key == field,
        Value::Array(segments) => {
            let joined: Vec<&str> = segments.iter().filter_map(Value::as_str).collect();
            joined.len() == segments.len() && joined.join(".") == field
        }
        _ => false,
    }
}

fn find_element_ref<'a>(node: &'a Value, field: &str) -> Option<&'a Map<String, Value>> {
    match node {
        Value::Array(items) => items.iter().find_map(|item| find_element_ref(item, field)),
        Value::Object(map) if map.get("key").is_some_and(|key| key_matches(key, field)) => {
            Some(map)
        }
        Value::Object(map) => map
            .get("items")
            .and_then(|items| find_element_ref(items, field)),
        _ => None,
    }
}

fn find_element<'a>(node: &'a mut Value, field: &str) -> Option<&'a mut Map<String, Value>> {
    match node {
        Value::Array(items) => items
            .iter_mut()
            .find_map(|item| find_element(item, field)),
        Value::Object(map) => {
            if map.get("key").is_some_and(|key| key_matches(key, field)) {
                Some(map)
            } else {
                map.get_mut("items")
                    .and_then(|items| find_element(items, field))
            }
        }
        _ => None,
    }
}
