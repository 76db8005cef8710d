//! The produced schema tree.
//!
//! Serialization omits every field holding its zero/empty value, so a
//! freshly generated tree encodes to the same compact document a
//! JSON-Schema consumer expects.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON Schema `type` keyword values this crate can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
}

/// A JSON-Schema-like node.
///
/// `properties` keeps field declaration order. `items` is only ever set
/// alongside `type: array`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(default, skip_serializing_if = "is_empty_map")]
    pub properties: Option<IndexMap<String, Schema>>,
    #[serde(default, skip_serializing_if = "is_empty_list")]
    pub required: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "is_empty_list")]
    pub r#enum: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "is_absent")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "is_absent")]
    pub example: Option<Value>,

    // numeric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<i64>,
    /// Zero means unconstrained and is never emitted.
    #[serde(default, skip_serializing_if = "is_unset_or_zero")]
    pub multiple_of: Option<i64>,

    // string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub pattern: Option<String>,

    // array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub unique_items: bool,

    // object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<i64>,
}

impl Schema {
    /// A schema carrying only a `type`.
    #[must_use]
    pub fn of(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    #[must_use]
    pub fn integer() -> Self {
        Self::of(SchemaType::Integer)
    }

    /// Integer schema bounded below by zero.
    #[must_use]
    pub fn unsigned() -> Self {
        Self {
            minimum: Some(0),
            ..Self::integer()
        }
    }

    #[must_use]
    pub fn number() -> Self {
        Self::of(SchemaType::Number)
    }

    #[must_use]
    pub fn boolean() -> Self {
        Self::of(SchemaType::Boolean)
    }

    #[must_use]
    pub fn object() -> Self {
        Self::of(SchemaType::Object)
    }

    #[must_use]
    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(SchemaType::Array)
        }
    }

    /// A `string` schema with a fixed `format`.
    #[must_use]
    pub fn formatted_string(format: &str) -> Self {
        Self {
            format: Some(format.to_string()),
            ..Self::string()
        }
    }

    pub fn is_string(&self) -> bool {
        self.schema_type == Some(SchemaType::String)
    }

    /// Look up a direct child property.
    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties.as_ref()?.get(name)
    }

    pub fn to_json(&self) -> Value {
        // Every field serializes to plain JSON; this cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn is_blank(v: &Option<String>) -> bool {
    v.as_deref().is_none_or(str::is_empty)
}

fn is_absent(v: &Option<Value>) -> bool {
    matches!(v, None | Some(Value::Null))
}

fn is_empty_list<T>(v: &Option<Vec<T>>) -> bool {
    v.as_ref().is_none_or(Vec::is_empty)
}

fn is_empty_map(v: &Option<IndexMap<String, Schema>>) -> bool {
    v.as_ref().is_none_or(IndexMap::is_empty)
}

fn is_unset_or_zero(v: &Option<i64>) -> bool {
    matches!(v, None | Some(0))
}

fn is_false(v: &bool) -> bool {
    !*v
}
