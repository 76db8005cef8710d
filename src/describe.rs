//! Descriptors for native Rust types.
//!
//! ```
//! use schema_synth::{schema_for, Describe, FieldDescriptor, TypeDescriptor};
//!
//! struct User;
//!
//! impl Describe for User {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::structure("User", vec![
//!             FieldDescriptor::of::<String>("Name").tag("json", "name"),
//!             FieldDescriptor::of::<Option<u32>>("Age").tag("json", "age,omitempty"),
//!         ])
//!     }
//! }
//!
//! let schema = schema_for::<User>().unwrap();
//! assert_eq!(schema.required, Some(vec!["name".to_string()]));
//! ```
use std::collections::{BTreeMap, HashMap};
use std::net::{IpAddr, Ipv4Addr};

use indexmap::IndexMap;

use crate::descriptor::{FieldDescriptor, FloatWidth, IntWidth, Kind, TypeDescriptor};
use crate::special;

/// A type that can describe its own shape.
///
/// A type that contains itself must refer to itself with
/// [`TypeRef::named`](crate::TypeRef::named), since `FieldDescriptor::of::<Self>`
/// would never return. Generating such a type fails with
/// [`SchemaError::CyclicType`](crate::SchemaError::CyclicType).
pub trait Describe {
    fn describe() -> TypeDescriptor;
}

impl FieldDescriptor {
    /// A field whose type is described by `T`.
    pub fn of<T: Describe>(name: impl Into<String>) -> Self {
        Self::new(name, T::describe())
    }
}

macro_rules! describe_primitive {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::primitive($kind)
                }
            }
        )*
    };
}

describe_primitive! {
    bool => Kind::Bool,
    i8 => Kind::Int(IntWidth::W8),
    i16 => Kind::Int(IntWidth::W16),
    i32 => Kind::Int(IntWidth::W32),
    i64 => Kind::Int(IntWidth::W64),
    i128 => Kind::Int(IntWidth::W128),
    isize => Kind::Int(IntWidth::Size),
    u8 => Kind::Uint(IntWidth::W8),
    u16 => Kind::Uint(IntWidth::W16),
    u32 => Kind::Uint(IntWidth::W32),
    u64 => Kind::Uint(IntWidth::W64),
    u128 => Kind::Uint(IntWidth::W128),
    usize => Kind::Uint(IntWidth::Size),
    f32 => Kind::Float(FloatWidth::F32),
    f64 => Kind::Float(FloatWidth::F64),
    String => Kind::String,
    char => Kind::String,
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::slice(T::describe())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::array(N, T::describe())
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::pointer(T::describe())
    }
}

impl<T: Describe> Describe for Box<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::pointer(T::describe())
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::map(K::describe(), V::describe())
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::map(K::describe(), V::describe())
    }
}

impl<K: Describe, V: Describe, S> Describe for IndexMap<K, V, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::map(K::describe(), V::describe())
    }
}

impl<Tz: chrono::TimeZone> Describe for chrono::DateTime<Tz> {
    fn describe() -> TypeDescriptor {
        special::timestamp()
    }
}

impl Describe for IpAddr {
    fn describe() -> TypeDescriptor {
        special::ip_addr()
    }
}

impl Describe for Ipv4Addr {
    fn describe() -> TypeDescriptor {
        special::ip_addr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{TypeCatalog, TypeRef};
    use crate::error::SchemaError;
    use crate::generate::{schema_for, schema_for_in};
    use crate::schema::Schema;
    use chrono::Utc;
    use serde_json::json;

    struct Event;

    impl Describe for Event {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::structure(
                "Event",
                vec![
                    FieldDescriptor::of::<chrono::DateTime<Utc>>("At").tag("json", "at"),
                    FieldDescriptor::of::<IpAddr>("Source").tag("json", "source"),
                    FieldDescriptor::of::<Vec<String>>("Labels")
                        .tag_literal(r#"json:"labels,omitempty" uniqueItems:"true""#),
                    FieldDescriptor::of::<Option<u16>>("Port")
                        .tag_literal(r#"json:"port,omitempty" maximum:"65535""#),
                    FieldDescriptor::of::<HashMap<String, i64>>("Counters").tag("json", "counters"),
                ],
            )
        }
    }

    #[test]
    fn native_struct_schema() {
        assert_eq!(
            schema_for::<Event>().unwrap().to_json(),
            json!({
                "type": "object",
                "properties": {
                    "at": {"type": "string", "format": "date-time"},
                    "source": {"type": "string", "format": "ipv4"},
                    "labels": {"type": "array", "items": {"type": "string"}, "uniqueItems": true},
                    "port": {"type": "integer", "minimum": 0, "maximum": 65535},
                    "counters": {}
                },
                "required": ["at", "source", "counters"]
            })
        );
    }

    #[test]
    fn option_and_box_match_the_inner_type() {
        assert_eq!(schema_for::<Option<f64>>().unwrap(), schema_for::<f64>().unwrap());
        assert_eq!(schema_for::<Box<Vec<u8>>>().unwrap(), schema_for::<Vec<u8>>().unwrap());
    }

    #[test]
    fn fixed_arrays_are_arrays() {
        assert_eq!(
            schema_for::<[i32; 4]>().unwrap(),
            Schema::array(Schema::integer())
        );
    }

    struct Tree;

    impl Describe for Tree {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::structure(
                "Tree",
                vec![
                    FieldDescriptor::of::<u32>("Value"),
                    FieldDescriptor::new("Children", TypeDescriptor::slice(TypeRef::named("Tree"))),
                ],
            )
        }
    }

    #[test]
    fn self_referencing_native_type_is_a_cycle() {
        match schema_for::<Tree>() {
            Err(SchemaError::CyclicType { path }) => assert_eq!(path, vec!["Tree", "Tree"]),
            other => panic!("expected CyclicType, got {other:?}"),
        }
    }

    struct Money;

    impl Describe for Money {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::structure("Money", vec![FieldDescriptor::of::<i64>("Cents")])
        }
    }

    struct Invoice;

    impl Describe for Invoice {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::structure(
                "Invoice",
                vec![FieldDescriptor::new("Total", TypeRef::named("Money")).tag("json", "total")],
            )
        }
    }

    #[test]
    fn native_fields_can_name_catalog_types() {
        let catalog: TypeCatalog = [Money::describe()].into_iter().collect();
        assert_eq!(
            schema_for_in::<Invoice>(&catalog).unwrap().to_json(),
            json!({
                "type": "object",
                "properties": {
                    "total": {
                        "type": "object",
                        "properties": {"Cents": {"type": "integer"}},
                        "required": ["Cents"]
                    }
                },
                "required": ["total"]
            })
        );
        assert!(matches!(
            schema_for::<Invoice>(),
            Err(SchemaError::UnknownType { name }) if name == "Money"
        ));
    }
}
