use clap::Args;
use serde::Deserialize;

/// Generation switches. All off by default, which keeps the classic
/// behaviour: untyped map placeholders and every declared field visited.
#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// emit `{"type": "object"}` for map types instead of an untyped placeholder
    #[arg(long, default_value_t = false)]
    pub typed_maps: bool,

    /// leave out struct fields that are not exported
    #[arg(long, default_value_t = false)]
    pub skip_unexported: bool,

    /// leave out struct fields whose serialized name is `-`
    #[arg(long, default_value_t = false)]
    pub skip_ignored: bool,
}

impl Options {
    /// The safer set: typed maps, only fields that can actually be encoded.
    pub fn strict() -> Self {
        Self {
            typed_maps: true,
            skip_unexported: true,
            skip_ignored: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_fill_defaults() {
        let options: Options = serde_json::from_str(r#"{"typed_maps": true}"#).unwrap();
        assert_eq!(
            options,
            Options {
                typed_maps: true,
                ..Options::default()
            }
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<Options>(r#"{"typed_map": true}"#).is_err());
    }
}
