//! Response shape detection
//!
//! The export does not answer with one fixed shape across deployments.
//! Depending on configuration the body is a bare list of records, an
//! object wrapping the list in `data`, an object with the list under some
//! other key, or a single record object. Everything downstream works on a
//! plain list of raw items, so the shape is resolved here once.

use serde_json::Value;

/// Detected layout of a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseShape {
    /// Top-level array
    List,
    /// Object with an array (or null) under `data`
    DataField,
    /// Object whose first array-valued field holds the records
    NestedList(String),
    /// Object without any array: one record
    Single,
    /// Scalar body, nothing to import
    Unusable,
}

impl std::fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List => f.write_str("list"),
            Self::DataField => f.write_str("data field"),
            Self::NestedList(key) => write!(f, "list in field {key}"),
            Self::Single => f.write_str("single record"),
            Self::Unusable => f.write_str("unusable"),
        }
    }
}

fn has_data_list(map: &serde_json::Map<String, Value>) -> bool {
    matches!(map.get("data"), Some(Value::Array(_) | Value::Null))
}

/// Classify a response body
pub fn detect_shape(body: &Value) -> ResponseShape {
    match body {
        Value::Array(_) => ResponseShape::List,
        Value::Object(map) if has_data_list(map) => ResponseShape::DataField,
        Value::Object(map) => map
            .iter()
            .find(|(_, v)| v.is_array())
            .map(|(key, _)| ResponseShape::NestedList(key.clone()))
            .unwrap_or(ResponseShape::Single),
        _ => ResponseShape::Unusable,
    }
}

/// Resolve a response body into its raw items
pub fn into_items(body: Value) -> (ResponseShape, Vec<Value>) {
    let shape = detect_shape(&body);
    let items = match (&shape, body) {
        (ResponseShape::List, Value::Array(items)) => items,
        (ResponseShape::DataField, Value::Object(mut map)) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        (ResponseShape::NestedList(key), Value::Object(mut map)) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        (ResponseShape::Single, body @ Value::Object(_)) => vec![body],
        _ => Vec::new(),
    };
    (shape, items)
}

/// Resolve a response body and log what was found
pub fn extract_items(body: Value, context: &str) -> Vec<Value> {
    let (shape, items) = into_items(body);
    match shape {
        ResponseShape::Unusable => {
            tracing::error!(
                context,
                "Cannot process API response, expected a list or an object"
            );
        }
        ResponseShape::List | ResponseShape::DataField => {
            tracing::info!(context, items = items.len(), %shape, "API response parsed");
        }
        ResponseShape::NestedList(_) | ResponseShape::Single => {
            tracing::warn!(
                context,
                items = items.len(),
                %shape,
                "Unexpected API response format"
            );
        }
    }
    items
}
