use std::num::ParseIntError;
use thiserror::Error;

/// Everything that can stop a schema from being generated.
///
/// Generation is fail-fast: the first error aborts the whole walk and no
/// partial schema is returned.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The type's kind has no schema mapping (functions, channels, ...).
    #[error("unsupported type {kind} from {type_name}")]
    UnsupportedType {
        kind: &'static str,
        type_name: String,
    },

    /// An integer constraint tag did not hold an integer.
    #[error("field `{field}`: invalid `{key}` tag {value:?}: {source}")]
    TagParse {
        field: String,
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// An `enum`/`default`/`example` tag is not a valid literal for a
    /// non-string schema.
    #[error("field `{field}`: invalid `{key}` value {value:?}: {source}")]
    ValueParse {
        field: String,
        key: &'static str,
        value: String,
        #[source]
        source: serde_json::Error,
    },

    /// A named type is reached again while it is still being expanded.
    #[error("cyclic type reference: {}", path.join(" -> "))]
    CyclicType { path: Vec<String> },

    /// A named type reference that no catalog entry or built-in resolves.
    #[error("unknown type `{name}`")]
    UnknownType { name: String },
}

/// Failure to read a type catalog document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("at JSON path {path} → {message}")]
    Syntax { path: String, message: String },
}
