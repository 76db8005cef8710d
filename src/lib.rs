//! Derive JSON-Schema-like documents from type descriptions.
//!
//! Feed a [`TypeDescriptor`] (or a [`TypeCatalog`] of named ones, or a
//! native type implementing [`Describe`]) to the [`Generator`] and get back a
//! [`Schema`] tree. Struct field metadata (`json`, `minimum`, `enum`, ...) is
//! read through [`TagLookup`] and becomes schema constraints.
pub mod config;
pub mod describe;
pub mod descriptor;
pub mod error;
pub mod generate;
pub mod path_de;
pub mod schema;
pub mod special;
pub mod tags;

pub use config::Options;
pub use describe::Describe;
pub use descriptor::{FieldDescriptor, FloatWidth, IntWidth, Kind, TypeCatalog, TypeDescriptor, TypeRef};
pub use error::{LoadError, SchemaError};
pub use generate::{coerce, generate_schema, schema_for, schema_for_in, Generator};
pub use schema::{Schema, SchemaType};
pub use tags::{StructTag, TagLookup, Tags};
