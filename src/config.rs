use serde::Deserialize;

use crate::error::ConfigError;

/// Knobs for the parsers, every field has a permissive default.
///
/// ```toml
/// max_chunk_size = 16777216
/// strict_webp_order = true
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ParseOptions {
    /// Reject any chunk whose declared size is above this.
    pub max_chunk_size: u32,

    /// Require `VP8 ` to be the first sub chunk of a WebP instead of merely present.
    pub strict_webp_order: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_chunk_size: u32::MAX,
            strict_webp_order: false,
        }
    }
}

impl ParseOptions {
    pub fn from_toml(config: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(config)?)
    }
}

#[cfg(test)]
mod test_parse_options {
    use super::*;

    #[test]
    fn empty_is_default() {
        assert_eq!(ParseOptions::from_toml("").unwrap(), ParseOptions::default());
    }

    #[test]
    fn partial() {
        let opts = ParseOptions::from_toml("strict_webp_order = true").unwrap();
        assert!(opts.strict_webp_order);
        assert_eq!(opts.max_chunk_size, u32::MAX);
    }

    #[test]
    fn full() {
        let opts = ParseOptions::from_toml(
            r#"
            max_chunk_size = 1024
            strict_webp_order = false
        "#,
        )
        .unwrap();
        assert_eq!(opts.max_chunk_size, 1024);
        assert!(!opts.strict_webp_order);
    }

    #[test]
    fn bad_type() {
        assert!(ParseOptions::from_toml("max_chunk_size = \"big\"").is_err());
    }
}
