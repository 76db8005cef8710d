//! Well-known types with a fixed canonical schema.
//!
//! The IP address override is consulted before kind dispatch and so applies
//! whatever the type's kind. Timestamp and URI overrides only apply to
//! struct-shaped types.
use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::descriptor::{IntWidth, Kind, TypeDescriptor};
use crate::schema::Schema;

pub const TIMESTAMP: &str = "chrono::DateTime";
pub const URI: &str = "url::Url";
pub const IP_ADDR: &str = "std::net::IpAddr";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Checked before the type's kind is looked at.
    BeforeDispatch,
    /// Checked once the type is known to be a struct.
    Struct,
}

#[derive(Debug, Clone, Copy)]
struct Override {
    stage: Stage,
    format: &'static str,
}

static REGISTRY: Lazy<HashMap<&'static str, Override>> = Lazy::new(|| {
    HashMap::from([
        (
            TIMESTAMP,
            Override {
                stage: Stage::Struct,
                format: "date-time",
            },
        ),
        (
            URI,
            Override {
                stage: Stage::Struct,
                format: "uri",
            },
        ),
        (
            IP_ADDR,
            Override {
                stage: Stage::BeforeDispatch,
                format: "ipv4",
            },
        ),
    ])
});

fn lookup(identity: &str, stage: Stage) -> Option<Schema> {
    REGISTRY
        .get(identity)
        .filter(|o| o.stage == stage)
        .map(|o| Schema::formatted_string(o.format))
}

/// Override applying to any kind.
pub fn before_dispatch(identity: &str) -> Option<Schema> {
    lookup(identity, Stage::BeforeDispatch)
}

/// Override applying to struct kinds only.
pub fn for_struct(identity: &str) -> Option<Schema> {
    lookup(identity, Stage::Struct)
}

pub fn timestamp() -> TypeDescriptor {
    TypeDescriptor::structure(TIMESTAMP, Vec::new())
}

pub fn uri() -> TypeDescriptor {
    TypeDescriptor::structure(URI, Vec::new())
}

/// Described as its byte representation.
pub fn ip_addr() -> TypeDescriptor {
    TypeDescriptor::slice(TypeDescriptor::primitive(Kind::Uint(IntWidth::W8))).named(IP_ADDR)
}

/// Built-in descriptor for a special type's full or short name.
pub fn descriptor(name: &str) -> Option<TypeDescriptor> {
    match name {
        TIMESTAMP | "DateTime" => Some(timestamp()),
        URI | "Url" => Some(uri()),
        IP_ADDR | "IpAddr" => Some(ip_addr()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ip_address_is_checked_before_dispatch() {
        assert_eq!(
            before_dispatch(IP_ADDR).unwrap().to_json(),
            json!({"type": "string", "format": "ipv4"})
        );
        assert!(for_struct(IP_ADDR).is_none());
    }

    #[test]
    fn timestamp_and_uri_need_struct_shape() {
        assert!(before_dispatch(TIMESTAMP).is_none());
        assert!(before_dispatch(URI).is_none());
        assert_eq!(for_struct(TIMESTAMP).unwrap().format.as_deref(), Some("date-time"));
        assert_eq!(for_struct(URI).unwrap().format.as_deref(), Some("uri"));
    }

    #[test]
    fn unknown_identity_is_not_special() {
        assert!(before_dispatch("User").is_none());
        assert!(for_struct("User").is_none());
        assert!(descriptor("User").is_none());
    }

    #[test]
    fn short_names_resolve_to_identities() {
        assert_eq!(descriptor("DateTime").unwrap().name, TIMESTAMP);
        assert_eq!(descriptor("Url").unwrap().name, URI);
        assert_eq!(descriptor("IpAddr").unwrap().name, IP_ADDR);
    }
}
