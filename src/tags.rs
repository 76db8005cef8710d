//! Field metadata.
//!
//! The generator only ever asks "does this field carry key K, and with
//! what text?". [`TagLookup`] is that question; [`Tags`] answers it from an
//! owned map and [`StructTag`] answers it straight from the conventional
//! `key:"value" key2:"value2"` literal.
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

/// Metadata key holding a field's serialized name and its options.
pub const SERIALIZATION_KEY: &str = "json";

/// Serialization option marking a field as optional.
pub const OMIT_EMPTY: &str = "omitempty";

/// `key:"value"` pairs; values may contain `\"` and `\\` escapes.
static TAG_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s:"]+):"((?:[^"\\]|\\.)*)""#).expect("tag pair regex is valid")
});

/// Key-based access to a field's metadata.
pub trait TagLookup {
    /// Value of `key`, or `None` when the field does not carry it.
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>>;
}

impl<T: TagLookup + ?Sized> TagLookup for &T {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        (**self).lookup(key)
    }
}

impl<S: std::hash::BuildHasher> TagLookup for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl TagLookup for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Borrowed(v.as_str()))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// OWNED TAGS
// ————————————————————————————————————————————————————————————————————————————

/// Owned, ordered field metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tags(IndexMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `key:"value" ...` literal. The first occurrence of a key wins.
    pub fn parse(literal: &str) -> Self {
        let mut tags = Self::new();
        for (key, value) in StructTag::new(literal).pairs() {
            tags.0.entry(key.to_string()).or_insert_with(|| value.into_owned());
        }
        tags
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl TagLookup for Tags {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(Cow::Borrowed)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Accepts either a `{"key": "value"}` map or a struct-tag literal string.
impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TagsVisitor;

        impl<'de> Visitor<'de> for TagsVisitor {
            type Value = Tags;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of tag values or a `key:\"value\"` tag literal")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Tags, E> {
                Ok(Tags::parse(v))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Tags, A::Error> {
                let mut tags = Tags::new();
                while let Some((key, value)) = map.next_entry::<String, String>()? {
                    tags.insert(key, value);
                }
                Ok(tags)
            }
        }

        deserializer.deserialize_any(TagsVisitor)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// STRUCT TAG LITERAL
// ————————————————————————————————————————————————————————————————————————————

/// Borrowed `key:"value"` literal, scanned on every lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructTag<'a>(&'a str);

impl<'a> StructTag<'a> {
    pub fn new(literal: &'a str) -> Self {
        Self(literal)
    }

    /// All well-formed pairs, in order. Malformed stretches are skipped.
    pub fn pairs(self) -> impl Iterator<Item = (&'a str, Cow<'a, str>)> + 'a {
        let literal = self.0;
        TAG_PAIR.captures_iter(literal).filter_map(|caps| {
            let key = caps.get(1)?.as_str();
            let raw = caps.get(2)?.as_str();
            Some((key, unescape(raw)))
        })
    }
}

impl TagLookup for StructTag<'_> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.pairs().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

fn unescape(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

// ————————————————————————————————————————————————————————————————————————————
// SERIALIZATION NAME
// ————————————————————————————————————————————————————————————————————————————

/// The parsed serialization-name tag: `name,opt1,opt2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerialName {
    name: Option<String>,
    options: Vec<String>,
}

impl SerialName {
    pub fn of<T: TagLookup + ?Sized>(tags: &T) -> Self {
        let Some(raw) = tags.lookup(SERIALIZATION_KEY) else {
            return Self::default();
        };
        let mut parts = raw.split(',');
        let name = parts.next().filter(|n| !n.is_empty()).map(str::to_string);
        let options = parts.map(str::to_string).collect();
        Self { name, options }
    }

    /// The exported property name, falling back to the declared field name.
    pub fn property_name(&self, declared: &str) -> String {
        self.name.clone().unwrap_or_else(|| declared.to_string())
    }

    pub fn omit_empty(&self) -> bool {
        self.options.iter().any(|o| o == OMIT_EMPTY)
    }

    /// `json:"-"`: never serialized.
    pub fn is_ignored(&self) -> bool {
        self.name.as_deref() == Some("-") && self.options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_tag_lookup_finds_first_match() {
        let tag = StructTag::new(r#"json:"age,omitempty" minimum:"0" minimum:"5""#);
        assert_eq!(tag.lookup("json").as_deref(), Some("age,omitempty"));
        assert_eq!(tag.lookup("minimum").as_deref(), Some("0"));
        assert_eq!(tag.lookup("maximum"), None);
    }

    #[test]
    fn struct_tag_unescapes_quotes() {
        let tag = StructTag::new(r#"description:"a \"quoted\" word" pattern:"^\\d+$""#);
        assert_eq!(tag.lookup("description").as_deref(), Some(r#"a "quoted" word"#));
        assert_eq!(tag.lookup("pattern").as_deref(), Some(r"^\d+$"));
    }

    #[test]
    fn empty_value_is_still_present() {
        let tag = StructTag::new(r#"format:"""#);
        assert_eq!(tag.lookup("format").as_deref(), Some(""));
    }

    #[test]
    fn parse_collects_pairs_in_order() {
        let tags = Tags::parse(r#"json:"name" description:"Display name" json:"other""#);
        let pairs: Vec<_> = tags.iter().collect();
        assert_eq!(pairs, vec![("json", "name"), ("description", "Display name")]);
    }

    #[test]
    fn tags_deserialize_from_map_or_literal() {
        let from_map: Tags = serde_json::from_str(r#"{"json": "id", "minimum": "1"}"#).unwrap();
        let from_literal: Tags = serde_json::from_str(r#""json:\"id\" minimum:\"1\"""#).unwrap();
        assert_eq!(from_map, from_literal);
    }

    #[test]
    fn serial_name_parts() {
        let tags: Tags = [("json", "age,omitempty")].into_iter().collect();
        let serial = SerialName::of(&tags);
        assert_eq!(serial.property_name("Age"), "age");
        assert!(serial.omit_empty());

        let bare = SerialName::of(&Tags::new());
        assert_eq!(bare.property_name("Age"), "Age");
        assert!(!bare.omit_empty());
    }

    #[test]
    fn serial_name_without_name_keeps_options() {
        let tags: Tags = [("json", ",omitempty")].into_iter().collect();
        let serial = SerialName::of(&tags);
        assert_eq!(serial.property_name("Nickname"), "Nickname");
        assert!(serial.omit_empty());
    }

    #[test]
    fn dash_marks_ignored_but_dash_comma_does_not() {
        let ignored: Tags = [("json", "-")].into_iter().collect();
        assert!(SerialName::of(&ignored).is_ignored());

        let literal_dash: Tags = [("json", "-,")].into_iter().collect();
        let serial = SerialName::of(&literal_dash);
        assert!(!serial.is_ignored());
        assert_eq!(serial.property_name("X"), "-");
    }
}
