use serde_json::Value;

use crate::schema::Schema;

/// Turn tag text into a value of the schema's type.
///
/// String schemas take the text as-is. Anything else is parsed as a JSON
/// literal, so `"5"` becomes a number, `"[1,2]"` an array and `"null"` null.
pub fn coerce(schema: &Schema, raw: &str) -> Result<Value, serde_json::Error> {
    if schema.is_string() {
        return Ok(Value::String(raw.to_string()));
    }
    serde_json::from_str(raw)
}
