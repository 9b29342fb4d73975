//! Type lattice for JSON cells.
//!
//! ```text
//! json
//! ├── number
//! │   └── integer
//! ├── boolean
//! ├── string
//! ├── array
//! └── object
//! ```
//!
//! JSON `null` is a missing value.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::type_hierarchy::{TreeTypeHierarchy, TreeTypeHierarchyBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Json,
    Number,
    Integer,
    Boolean,
    String,
    Array,
    Object,
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonType::Json => "json",
            JsonType::Number => "number",
            JsonType::Integer => "integer",
            JsonType::Boolean => "boolean",
            JsonType::String => "string",
            JsonType::Array => "array",
            JsonType::Object => "object",
        };
        f.write_str(name)
    }
}

pub fn json_hierarchy() -> TreeTypeHierarchy<Value, JsonType> {
    let mut builder = TreeTypeHierarchyBuilder::new(JsonType::Json);
    let root = builder.root();
    let number = builder.add_child(root, JsonType::Number, Value::is_number);
    builder.add_child(number, JsonType::Integer, |v: &Value| {
        v.is_i64() || v.is_u64()
    });
    builder.add_child(root, JsonType::Boolean, Value::is_boolean);
    builder.add_child(root, JsonType::String, Value::is_string);
    builder.add_child(root, JsonType::Array, Value::is_array);
    builder.add_child(root, JsonType::Object, Value::is_object);
    builder.missing_when(Value::is_null).build()
}

/// Column name for a JSON header cell: strings verbatim, other scalars
/// rendered, containers and blanks yield no name.
pub fn json_column_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
