use serde::Deserialize;

/// Property names that mark a pagination envelope (the Spring-style page
/// object observed in practice). A schema counts as paged when it holds an
/// array-of-refs property and at least [`PAGED_MARKER_MIN`] of these keys.
/// Names are matched case-sensitively.
pub const PAGED_MARKER_KEYS: [&str; 7] = [
    "totalElements",
    "totalPages",
    "number",
    "size",
    "pageable",
    "first",
    "last",
];

/// How many marker keys must be present before a schema counts as paged.
pub const PAGED_MARKER_MIN: usize = 2;

/// Bucket label for operations that declare no tags.
pub const UNTAGGED_BUCKET: &str = "untagged";

/// Tunables for a derivation pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeriveConfig {
    /// Marker keys identifying a pagination envelope.
    pub paged_marker_keys: Vec<String>,
    /// Tag label under which untagged operations are grouped.
    pub untagged_label: String,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            paged_marker_keys: PAGED_MARKER_KEYS.iter().map(|k| (*k).to_string()).collect(),
            untagged_label: UNTAGGED_BUCKET.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = DeriveConfig::default();
        assert_eq!(config.paged_marker_keys.len(), PAGED_MARKER_KEYS.len());
        assert_eq!(config.untagged_label, "untagged");
    }

    #[test]
    fn parse_config_yaml() {
        let yaml = r#"
paged_marker_keys: [count, pages]
untagged_label: misc
"#;
        let config: DeriveConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.paged_marker_keys, vec!["count", "pages"]);
        assert_eq!(config.untagged_label, "misc");
    }

    #[test]
    fn parse_partial_config_keeps_defaults() {
        let yaml = "untagged_label: other\n";
        let config: DeriveConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.untagged_label, "other");
        assert_eq!(config.paged_marker_keys.len(), PAGED_MARKER_KEYS.len());
    }
}
