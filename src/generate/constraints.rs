use serde_json::Value;

use super::coerce::coerce;
use crate::error::SchemaError;
use crate::schema::Schema;
use crate::tags::TagLookup;

/// Apply a field's constraint tags to its schema, in vocabulary order.
///
/// `enum`, `default` and `example` are coerced against the schema's
/// `type`, so this must run after the dispatcher produced the base schema.
/// Keys the field does not carry leave the schema untouched.
pub(super) fn apply<T: TagLookup + ?Sized>(
    schema: &mut Schema,
    field: &str,
    tags: &T,
) -> Result<(), SchemaError> {
    if let Some(v) = tags.lookup("description") {
        schema.description = Some(v.into_owned());
    }
    if let Some(v) = tags.lookup("format") {
        schema.format = Some(v.into_owned());
    }
    if let Some(v) = tags.lookup("enum") {
        let values = v
            .split(',')
            .map(|item| coerce_tag(schema, field, "enum", item))
            .collect::<Result<Vec<_>, _>>()?;
        schema.r#enum = Some(values);
    }
    if let Some(v) = tags.lookup("default") {
        schema.default = Some(coerce_tag(schema, field, "default", &v)?);
    }
    if let Some(v) = tags.lookup("example") {
        schema.example = Some(coerce_tag(schema, field, "example", &v)?);
    }

    if let Some(v) = integer_tag(tags, field, "minimum")? {
        schema.minimum = Some(v);
    }
    if let Some(v) = integer_tag(tags, field, "exclusiveMinimum")? {
        schema.exclusive_minimum = Some(v);
    }
    if let Some(v) = integer_tag(tags, field, "maximum")? {
        schema.maximum = Some(v);
    }
    if let Some(v) = integer_tag(tags, field, "exclusiveMaximum")? {
        schema.exclusive_maximum = Some(v);
    }
    if let Some(v) = integer_tag(tags, field, "multipleOf")? {
        schema.multiple_of = Some(v);
    }
    if let Some(v) = integer_tag(tags, field, "minLength")? {
        schema.min_length = Some(v);
    }
    if let Some(v) = integer_tag(tags, field, "maxLength")? {
        schema.max_length = Some(v);
    }

    if let Some(v) = tags.lookup("pattern") {
        schema.pattern = Some(v.into_owned());
    }

    if let Some(v) = integer_tag(tags, field, "minItems")? {
        schema.min_items = Some(v);
    }
    if let Some(v) = integer_tag(tags, field, "maxItems")? {
        schema.max_items = Some(v);
    }
    if let Some(v) = tags.lookup("uniqueItems") {
        schema.unique_items = v == "true";
    }

    if let Some(v) = integer_tag(tags, field, "minProperties")? {
        schema.min_properties = Some(v);
    }
    if let Some(v) = integer_tag(tags, field, "maxProperties")? {
        schema.max_properties = Some(v);
    }

    Ok(())
}

fn coerce_tag(
    schema: &Schema,
    field: &str,
    key: &'static str,
    raw: &str,
) -> Result<Value, SchemaError> {
    coerce(schema, raw).map_err(|source| SchemaError::ValueParse {
        field: field.to_string(),
        key,
        value: raw.to_string(),
        source,
    })
}

/// Integer-valued tag. Fractional text is rejected even on `number` schemas.
fn integer_tag<T: TagLookup + ?Sized>(
    tags: &T,
    field: &str,
    key: &'static str,
) -> Result<Option<i64>, SchemaError> {
    let Some(raw) = tags.lookup(key) else {
        return Ok(None);
    };
    raw.parse::<i64>()
        .map(Some)
        .map_err(|source| SchemaError::TagParse {
            field: field.to_string(),
            key,
            value: raw.into_owned(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{StructTag, Tags};
    use rstest::rstest;
    use serde_json::json;

    fn applied(mut schema: Schema, literal: &str) -> Result<Schema, SchemaError> {
        apply(&mut schema, "Field", &StructTag::new(literal))?;
        Ok(schema)
    }

    #[test]
    fn verbatim_string_tags() {
        let schema = applied(
            Schema::string(),
            r#"description:"Contact address" format:"email" pattern:"^[^@]+@[^@]+$""#,
        )
        .unwrap();
        assert_eq!(
            schema.to_json(),
            json!({
                "type": "string",
                "description": "Contact address",
                "format": "email",
                "pattern": "^[^@]+@[^@]+$"
            })
        );
    }

    #[test]
    fn string_enum_is_split_verbatim() {
        let schema = applied(Schema::string(), r#"enum:"a,b,c""#).unwrap();
        assert_eq!(schema.r#enum, Some(vec![json!("a"), json!("b"), json!("c")]));
    }

    #[test]
    fn integer_enum_is_parsed() {
        let schema = applied(Schema::integer(), r#"enum:"1,2,3""#).unwrap();
        assert_eq!(schema.r#enum, Some(vec![json!(1), json!(2), json!(3)]));
    }

    #[test]
    fn bad_enum_element_fails() {
        match applied(Schema::integer(), r#"enum:"1,two,3""#) {
            Err(SchemaError::ValueParse { key, value, .. }) => {
                assert_eq!(key, "enum");
                assert_eq!(value, "two");
            }
            other => panic!("expected ValueParse, got {other:?}"),
        }
    }

    #[test]
    fn default_and_example_follow_schema_type() {
        let text = applied(Schema::string(), r#"default:"42" example:"true""#).unwrap();
        assert_eq!(text.default, Some(json!("42")));
        assert_eq!(text.example, Some(json!("true")));

        let flag = applied(Schema::boolean(), r#"default:"true" example:"false""#).unwrap();
        assert_eq!(flag.default, Some(json!(true)));
        assert_eq!(flag.example, Some(json!(false)));

        let list = applied(
            Schema::array(Schema::integer()),
            r#"default:"[1, 2]" example:"[3]""#,
        )
        .unwrap();
        assert_eq!(list.default, Some(json!([1, 2])));
        assert_eq!(list.example, Some(json!([3])));
    }

    #[rstest]
    #[case(Schema::integer(), "default", "forty")]
    #[case(Schema::boolean(), "example", "yes")]
    #[case(Schema::number(), "default", "1.5.2")]
    #[case(Schema::array(Schema::string()), "example", "a,b")]
    fn bad_default_or_example_names_its_key(
        #[case] schema: Schema,
        #[case] key: &str,
        #[case] raw: &str,
    ) {
        let mut schema = schema;
        let tags: Tags = [(key, raw)].into_iter().collect();
        match apply(&mut schema, "Level", &tags) {
            Err(SchemaError::ValueParse { field, key: k, value, .. }) => {
                assert_eq!(field, "Level");
                assert_eq!(k, key);
                assert_eq!(value, raw);
            }
            other => panic!("expected ValueParse, got {other:?}"),
        }
    }

    #[test]
    fn zero_multiple_of_tag_is_not_emitted() {
        let schema = applied(Schema::integer(), r#"multipleOf:"0""#).unwrap();
        assert_eq!(schema.multiple_of, Some(0));
        assert_eq!(schema.to_json(), json!({"type": "integer"}));
    }

    #[test]
    fn bounds_on_an_integer() {
        let schema = applied(Schema::integer(), r#"minimum:"0" maximum:"150""#).unwrap();
        assert_eq!(
            schema.to_json(),
            json!({"type": "integer", "minimum": 0, "maximum": 150})
        );
    }

    #[rstest]
    #[case("minimum", json!({"minimum": -5}))]
    #[case("exclusiveMinimum", json!({"exclusiveMinimum": -5}))]
    #[case("maximum", json!({"maximum": -5}))]
    #[case("exclusiveMaximum", json!({"exclusiveMaximum": -5}))]
    #[case("multipleOf", json!({"multipleOf": -5}))]
    #[case("minLength", json!({"minLength": -5}))]
    #[case("maxLength", json!({"maxLength": -5}))]
    #[case("minItems", json!({"minItems": -5}))]
    #[case("maxItems", json!({"maxItems": -5}))]
    #[case("minProperties", json!({"minProperties": -5}))]
    #[case("maxProperties", json!({"maxProperties": -5}))]
    fn integer_tags_land_in_their_field(#[case] key: &str, #[case] expected: Value) {
        let tags: Tags = [(key, "-5")].into_iter().collect();
        let mut schema = Schema::default();
        apply(&mut schema, "Field", &tags).unwrap();
        assert_eq!(schema.to_json(), expected);
    }

    #[rstest]
    #[case("minimum", "1.5")]
    #[case("maxLength", "ten")]
    #[case("multipleOf", "")]
    #[case("maxProperties", " 3")]
    fn non_integer_text_is_a_tag_error(#[case] key: &str, #[case] raw: &str) {
        let tags: Tags = [(key, raw)].into_iter().collect();
        let mut schema = Schema::number();
        match apply(&mut schema, "Ratio", &tags) {
            Err(SchemaError::TagParse { field, key: k, value, .. }) => {
                assert_eq!(field, "Ratio");
                assert_eq!(k, key);
                assert_eq!(value, raw);
            }
            other => panic!("expected TagParse, got {other:?}"),
        }
    }

    #[rstest]
    #[case("true", true)]
    #[case("false", false)]
    #[case("TRUE", false)]
    #[case("1", false)]
    fn unique_items_needs_literal_true(#[case] raw: &str, #[case] expected: bool) {
        let tags: Tags = [("uniqueItems", raw)].into_iter().collect();
        let mut schema = Schema::array(Schema::string());
        schema.unique_items = !expected;
        apply(&mut schema, "Field", &tags).unwrap();
        assert_eq!(schema.unique_items, expected);
    }

    #[test]
    fn untagged_fields_are_untouched() {
        let before = Schema::unsigned();
        let after = applied(before.clone(), r#"json:"count""#).unwrap();
        assert_eq!(before, after);
    }
}
