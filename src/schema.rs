//! Type inference and per-field schema derivation.

use std::fmt;

use serde::Serialize;

use crate::model::{Database, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    String,
    Array,
    Integer,
    Float,
    Boolean,
    Unknown,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Array => "array",
            TypeTag::Integer => "integer",
            TypeTag::Float => "float",
            TypeTag::Boolean => "boolean",
            TypeTag::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn infer_type(value: &Value) -> TypeTag {
    match value {
        Value::String(_) => TypeTag::String,
        Value::Array(_) => TypeTag::Array,
        Value::Integer(_) => TypeTag::Integer,
        Value::Float(_) => TypeTag::Float,
        Value::Boolean(_) => TypeTag::Boolean,
        Value::Other(_) => TypeTag::Unknown,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaEntry {
    pub category: String,
    pub key: String,
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    pub description: String,
    /// Display text of the current value.
    pub example: String,
}

/// One entry per non-description field, in database order.
pub fn build_schema(db: &Database) -> Vec<SchemaEntry> {
    db.all_fields()
        .into_iter()
        .map(|f| SchemaEntry {
            type_tag: infer_type(&f.value),
            example: f.value.to_string(),
            description: f.desc,
            category: f.category,
            key: f.key,
        })
        .collect()
}
