//! Type → schema generation.
//!
//! [`Generator`] is the single recursive entry point. For every type it
//! consults the special-type registry, then dispatches on kind. Structs are
//! handed to the field builder (`structs`), which recurses back here for each
//! field type and then applies the field's constraint tags (`constraints`).
//!
//! Generation is fail-fast: the first error anywhere in the walk is returned
//! and nothing built so far survives.
pub mod coerce;
mod constraints;
mod structs;

use tracing::{debug, trace};

use crate::config::Options;
use crate::describe::Describe;
use crate::descriptor::{Kind, TypeCatalog, TypeDescriptor, TypeRef};
use crate::error::SchemaError;
use crate::schema::Schema;
use crate::special;

pub use coerce::coerce;

// ------------------------------- Front API -------------------------------- //

/// Schema for a standalone descriptor, with default options. Named
/// references resolve against the built-in types only.
pub fn generate_schema(ty: &TypeDescriptor) -> Result<Schema, SchemaError> {
    let catalog = TypeCatalog::new();
    Generator::new(&catalog).generate_descriptor(ty)
}

/// Schema for a native Rust type.
pub fn schema_for<T: Describe>() -> Result<Schema, SchemaError> {
    schema_for_in::<T>(&TypeCatalog::new())
}

/// Schema for a native Rust type whose fields may name catalog types.
pub fn schema_for_in<T: Describe>(catalog: &TypeCatalog) -> Result<Schema, SchemaError> {
    Generator::new(catalog).generate_described::<T>()
}

pub struct Generator<'c> {
    catalog: &'c TypeCatalog,
    options: Options,
    /// Named types currently being expanded, outermost first.
    expanding: Vec<String>,
}

impl<'c> Generator<'c> {
    pub fn new(catalog: &'c TypeCatalog) -> Self {
        Self {
            catalog,
            options: Options::default(),
            expanding: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn generate(&mut self, ty: &TypeRef) -> Result<Schema, SchemaError> {
        self.expanding.clear();
        self.visit(ty)
    }

    pub fn generate_descriptor(&mut self, ty: &TypeDescriptor) -> Result<Schema, SchemaError> {
        self.expanding.clear();
        self.dispatch(ty)
    }

    /// Schema for a native type. Its own name counts as being expanded, so
    /// a field naming the type again is reported as a cycle.
    pub fn generate_described<T: Describe>(&mut self) -> Result<Schema, SchemaError> {
        let desc = T::describe();
        self.expanding.clear();
        self.expanding.push(desc.name.clone());
        let result = self.dispatch(&desc);
        self.expanding.pop();
        result
    }

    /// Schema for a type declared in the catalog (or a built-in name).
    pub fn generate_named(&mut self, name: &str) -> Result<Schema, SchemaError> {
        self.expanding.clear();
        self.visit_named(name)
    }

    // ---------------------------- Recursion ------------------------------- //

    fn visit(&mut self, ty: &TypeRef) -> Result<Schema, SchemaError> {
        match ty {
            TypeRef::Inline(desc) => self.dispatch(desc),
            TypeRef::Named(name) => self.visit_named(name),
        }
    }

    fn visit_named(&mut self, name: &str) -> Result<Schema, SchemaError> {
        if self.expanding.iter().any(|n| n == name) {
            let mut path = self.expanding.clone();
            path.push(name.to_string());
            return Err(SchemaError::CyclicType { path });
        }
        let catalog = self.catalog;
        let desc = catalog
            .resolve(name)
            .ok_or_else(|| SchemaError::UnknownType {
                name: name.to_string(),
            })?;
        trace!(name, "expanding named type");

        self.expanding.push(name.to_string());
        let result = self.dispatch(&desc);
        self.expanding.pop();
        result
    }

    fn dispatch(&mut self, ty: &TypeDescriptor) -> Result<Schema, SchemaError> {
        if let Some(schema) = special::before_dispatch(&ty.name) {
            debug!(type_name = %ty.name, "special type override");
            return Ok(schema);
        }

        match &ty.kind {
            Kind::Struct { fields } => {
                if let Some(schema) = special::for_struct(&ty.name) {
                    debug!(type_name = %ty.name, "special type override");
                    return Ok(schema);
                }
                self.build_struct(ty, fields)
            }
            Kind::Map { .. } => {
                if self.options.typed_maps {
                    Ok(Schema::object())
                } else {
                    Ok(Schema::default())
                }
            }
            Kind::Slice { elem } | Kind::Array { elem, .. } => Ok(Schema::array(self.visit(elem)?)),
            Kind::Int(_) => Ok(Schema::integer()),
            // unsigned values can't be negative
            Kind::Uint(_) => Ok(Schema::unsigned()),
            Kind::Float(_) => Ok(Schema::number()),
            Kind::Bool => Ok(Schema::boolean()),
            Kind::String => Ok(Schema::string()),
            Kind::Pointer { elem } => self.visit(elem),
            Kind::Func | Kind::Chan | Kind::Complex | Kind::Interface | Kind::RawPointer => {
                Err(SchemaError::UnsupportedType {
                    kind: ty.kind.name(),
                    type_name: ty.name.clone(),
                })
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
