//! Type descriptions fed to the generator.
//!
//! A [`TypeDescriptor`] is a type's identity plus its structural [`Kind`].
//! Element and field types are [`TypeRef`]s: either an inline descriptor or
//! the name of a type declared in a [`TypeCatalog`]. Named references are
//! what make recursive types expressible.
use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::error::LoadError;
use crate::special;
use crate::tags::Tags;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
    W128,
    Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    F32,
    F64,
}

/// Structural category of a type, independent of its name.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Bool,
    Int(IntWidth),
    Uint(IntWidth),
    Float(FloatWidth),
    String,
    Struct { fields: Vec<FieldDescriptor> },
    Slice { elem: Box<TypeRef> },
    Array { len: usize, elem: Box<TypeRef> },
    Map { key: Box<TypeRef>, value: Box<TypeRef> },
    Pointer { elem: Box<TypeRef> },
    // no schema mapping
    Func,
    Chan,
    Complex,
    Interface,
    RawPointer,
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int(w) => match w {
                IntWidth::W8 => "i8",
                IntWidth::W16 => "i16",
                IntWidth::W32 => "i32",
                IntWidth::W64 => "i64",
                IntWidth::W128 => "i128",
                IntWidth::Size => "isize",
            },
            Kind::Uint(w) => match w {
                IntWidth::W8 => "u8",
                IntWidth::W16 => "u16",
                IntWidth::W32 => "u32",
                IntWidth::W64 => "u64",
                IntWidth::W128 => "u128",
                IntWidth::Size => "usize",
            },
            Kind::Float(FloatWidth::F32) => "f32",
            Kind::Float(FloatWidth::F64) => "f64",
            Kind::String => "string",
            Kind::Struct { .. } => "struct",
            Kind::Slice { .. } => "slice",
            Kind::Array { .. } => "array",
            Kind::Map { .. } => "map",
            Kind::Pointer { .. } => "pointer",
            Kind::Func => "func",
            Kind::Chan => "chan",
            Kind::Complex => "complex",
            Kind::Interface => "interface",
            Kind::RawPointer => "raw pointer",
        }
    }
}

/// A type's identity and shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawType")]
pub struct TypeDescriptor {
    /// Identity used for special-type lookup and error messages.
    pub name: String,
    pub kind: Kind,
}

/// Either an inline type or the name of one declared elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    Inline(Box<TypeDescriptor>),
    Named(String),
}

/// A struct field: declared name, type, visibility and metadata.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default = "exported_by_default")]
    pub exported: bool,
}

fn exported_by_default() -> bool {
    true
}

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTORS
// ————————————————————————————————————————————————————————————————————————————

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// An anonymous primitive, named after its kind.
    pub fn primitive(kind: Kind) -> Self {
        Self::new(kind.name(), kind)
    }

    pub fn structure(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(name, Kind::Struct { fields })
    }

    pub fn slice(elem: impl Into<TypeRef>) -> Self {
        let elem = elem.into();
        Self::new(
            format!("Vec<{}>", elem.display_name()),
            Kind::Slice {
                elem: Box::new(elem),
            },
        )
    }

    pub fn array(len: usize, elem: impl Into<TypeRef>) -> Self {
        let elem = elem.into();
        Self::new(
            format!("[{}; {len}]", elem.display_name()),
            Kind::Array {
                len,
                elem: Box::new(elem),
            },
        )
    }

    pub fn map(key: impl Into<TypeRef>, value: impl Into<TypeRef>) -> Self {
        let (key, value) = (key.into(), value.into());
        Self::new(
            format!("Map<{}, {}>", key.display_name(), value.display_name()),
            Kind::Map {
                key: Box::new(key),
                value: Box::new(value),
            },
        )
    }

    pub fn pointer(elem: impl Into<TypeRef>) -> Self {
        let elem = elem.into();
        Self::new(
            format!("Option<{}>", elem.display_name()),
            Kind::Pointer {
                elem: Box::new(elem),
            },
        )
    }

    /// Rename, keeping the shape.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn display_name(&self) -> &str {
        match self {
            TypeRef::Inline(desc) => &desc.name,
            TypeRef::Named(name) => name,
        }
    }
}

impl From<TypeDescriptor> for TypeRef {
    fn from(desc: TypeDescriptor) -> Self {
        TypeRef::Inline(Box::new(desc))
    }
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            tags: Tags::new(),
            exported: true,
        }
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key, value);
        self
    }

    /// Replace all metadata with the pairs of a `key:"value"` literal.
    pub fn tag_literal(mut self, literal: &str) -> Self {
        self.tags = Tags::parse(literal);
        self
    }

    pub fn unexported(mut self) -> Self {
        self.exported = false;
        self
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CATALOG
// ————————————————————————————————————————————————————————————————————————————

/// Declared named types, in declaration order.
///
/// Resolution checks declared types first, then the built-in primitive
/// and special-type names, so a declaration can shadow a built-in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeCatalog {
    types: IndexMap<String, TypeDescriptor>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `{"types": {...}}` document.
    pub fn from_json(src: &str) -> Result<Self, LoadError> {
        crate::path_de::from_str_with_path(src)
    }

    /// Declare a type under its own name; returns the one it replaced.
    pub fn insert(&mut self, desc: TypeDescriptor) -> Option<TypeDescriptor> {
        self.types.insert(desc.name.clone(), desc)
    }

    /// Fold `other` into `self`. Later declarations win; the replaced
    /// names are returned.
    pub fn merge(&mut self, other: TypeCatalog) -> Vec<String> {
        let mut replaced = Vec::new();
        for (name, desc) in other.types {
            if self.types.insert(name.clone(), desc).is_some() {
                replaced.push(name);
            }
        }
        replaced
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn resolve(&self, name: &str) -> Option<Cow<'_, TypeDescriptor>> {
        match self.types.get(name) {
            Some(desc) => Some(Cow::Borrowed(desc)),
            None => builtin(name).map(Cow::Owned),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<TypeDescriptor> for TypeCatalog {
    fn from_iter<I: IntoIterator<Item = TypeDescriptor>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for desc in iter {
            catalog.insert(desc);
        }
        catalog
    }
}

/// Names every catalog resolves without declaring them.
pub fn builtin(name: &str) -> Option<TypeDescriptor> {
    let kind = match name {
        "bool" => Kind::Bool,
        "i8" => Kind::Int(IntWidth::W8),
        "i16" => Kind::Int(IntWidth::W16),
        "i32" => Kind::Int(IntWidth::W32),
        "i64" => Kind::Int(IntWidth::W64),
        "i128" => Kind::Int(IntWidth::W128),
        "isize" => Kind::Int(IntWidth::Size),
        "u8" => Kind::Uint(IntWidth::W8),
        "u16" => Kind::Uint(IntWidth::W16),
        "u32" => Kind::Uint(IntWidth::W32),
        "u64" => Kind::Uint(IntWidth::W64),
        "u128" => Kind::Uint(IntWidth::W128),
        "usize" => Kind::Uint(IntWidth::Size),
        "f32" => Kind::Float(FloatWidth::F32),
        "f64" => Kind::Float(FloatWidth::F64),
        "String" | "str" | "string" => Kind::String,
        other => return special::descriptor(other),
    };
    Some(TypeDescriptor::primitive(kind))
}

// ————————————————————————————————————————————————————————————————————————————
// DESERIALIZATION
// ————————————————————————————————————————————————————————————————————————————

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
    #[serde(default)]
    types: IndexMap<String, CatalogEntry>,
}

/// A top-level declaration, remembering whether it named itself.
#[derive(Deserialize)]
#[serde(try_from = "RawType")]
struct CatalogEntry {
    desc: TypeDescriptor,
    explicit_name: bool,
}

impl TryFrom<RawType> for CatalogEntry {
    type Error = String;

    fn try_from(raw: RawType) -> Result<Self, Self::Error> {
        let explicit_name = raw.name.is_some();
        Ok(Self {
            desc: TypeDescriptor::try_from(raw)?,
            explicit_name,
        })
    }
}

impl<'de> Deserialize<'de> for TypeCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawCatalog::deserialize(deserializer)?;
        let mut types = IndexMap::with_capacity(raw.types.len());
        for (key, entry) in raw.types {
            // an explicit `name` is the identity; otherwise the key is
            let desc = if entry.explicit_name {
                entry.desc
            } else {
                entry.desc.named(key.clone())
            };
            types.insert(key, desc);
        }
        Ok(Self { types })
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum KindTag {
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    String,
    Struct,
    Slice,
    Array,
    Map,
    Pointer,
    Func,
    Chan,
    Complex,
    Interface,
    RawPointer,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawType {
    #[serde(default)]
    name: Option<String>,
    kind: KindTag,
    #[serde(default)]
    fields: Vec<FieldDescriptor>,
    #[serde(default)]
    elem: Option<TypeRef>,
    #[serde(default)]
    key: Option<TypeRef>,
    #[serde(default)]
    value: Option<TypeRef>,
    #[serde(default)]
    len: Option<usize>,
}

impl TryFrom<RawType> for TypeDescriptor {
    type Error = String;

    fn try_from(raw: RawType) -> Result<Self, Self::Error> {
        fn need(part: Option<TypeRef>, what: &str, kind: &str) -> Result<TypeRef, String> {
            part.ok_or_else(|| format!("`{kind}` type requires `{what}`"))
        }

        let desc = match raw.kind {
            KindTag::Bool => Self::primitive(Kind::Bool),
            KindTag::I8 => Self::primitive(Kind::Int(IntWidth::W8)),
            KindTag::I16 => Self::primitive(Kind::Int(IntWidth::W16)),
            KindTag::I32 => Self::primitive(Kind::Int(IntWidth::W32)),
            KindTag::I64 => Self::primitive(Kind::Int(IntWidth::W64)),
            KindTag::I128 => Self::primitive(Kind::Int(IntWidth::W128)),
            KindTag::Isize => Self::primitive(Kind::Int(IntWidth::Size)),
            KindTag::U8 => Self::primitive(Kind::Uint(IntWidth::W8)),
            KindTag::U16 => Self::primitive(Kind::Uint(IntWidth::W16)),
            KindTag::U32 => Self::primitive(Kind::Uint(IntWidth::W32)),
            KindTag::U64 => Self::primitive(Kind::Uint(IntWidth::W64)),
            KindTag::U128 => Self::primitive(Kind::Uint(IntWidth::W128)),
            KindTag::Usize => Self::primitive(Kind::Uint(IntWidth::Size)),
            KindTag::F32 => Self::primitive(Kind::Float(FloatWidth::F32)),
            KindTag::F64 => Self::primitive(Kind::Float(FloatWidth::F64)),
            KindTag::String => Self::primitive(Kind::String),
            KindTag::Struct => Self::structure("struct", raw.fields),
            KindTag::Slice => Self::slice(need(raw.elem, "elem", "slice")?),
            KindTag::Array => {
                let len = raw.len.ok_or("`array` type requires `len`")?;
                Self::array(len, need(raw.elem, "elem", "array")?)
            }
            KindTag::Map => Self::map(
                need(raw.key, "key", "map")?,
                need(raw.value, "value", "map")?,
            ),
            KindTag::Pointer => Self::pointer(need(raw.elem, "elem", "pointer")?),
            KindTag::Func => Self::primitive(Kind::Func),
            KindTag::Chan => Self::primitive(Kind::Chan),
            KindTag::Complex => Self::primitive(Kind::Complex),
            KindTag::Interface => Self::primitive(Kind::Interface),
            KindTag::RawPointer => Self::primitive(Kind::RawPointer),
        };
        Ok(match raw.name {
            Some(name) => desc.named(name),
            None => desc,
        })
    }
}

/// A bare string names a type; a map is an inline descriptor.
impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TypeRefVisitor;

        impl<'de> Visitor<'de> for TypeRefVisitor {
            type Value = TypeRef;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a type name or an inline type description")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TypeRef, E> {
                Ok(TypeRef::named(v))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<TypeRef, A::Error> {
                let desc = TypeDescriptor::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(desc.into())
            }
        }

        deserializer.deserialize_any(TypeRefVisitor)
    }
}
