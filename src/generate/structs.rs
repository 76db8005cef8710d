use indexmap::IndexMap;
use tracing::trace;

use super::{constraints, Generator};
use crate::descriptor::{FieldDescriptor, TypeDescriptor};
use crate::error::SchemaError;
use crate::schema::Schema;
use crate::tags::SerialName;

impl Generator<'_> {
    /// `type: object` with one property per visited field, in declaration
    /// order. A field without the `omitempty` marker is required.
    pub(super) fn build_struct(
        &mut self,
        owner: &TypeDescriptor,
        fields: &[FieldDescriptor],
    ) -> Result<Schema, SchemaError> {
        let mut properties: IndexMap<String, Schema> = IndexMap::with_capacity(fields.len());
        let mut required: Vec<String> = Vec::new();

        for field in fields {
            if self.options.skip_unexported && !field.exported {
                trace!(owner = %owner.name, field = %field.name, "skipping unexported field");
                continue;
            }
            let serial = SerialName::of(&field.tags);
            if self.options.skip_ignored && serial.is_ignored() {
                trace!(owner = %owner.name, field = %field.name, "skipping ignored field");
                continue;
            }

            let name = serial.property_name(&field.name);
            let mut schema = self.visit(&field.ty)?;
            constraints::apply(&mut schema, &field.name, &field.tags)?;

            if !serial.omit_empty() && !required.contains(&name) {
                required.push(name.clone());
            }
            // a later field with the same name replaces the earlier one in place
            properties.insert(name, schema);
        }

        Ok(Schema {
            properties: (!properties.is_empty()).then_some(properties),
            required: (!required.is_empty()).then_some(required),
            ..Schema::object()
        })
    }
}
