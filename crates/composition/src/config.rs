/// Composition policies. Loadable from TOML:
///
/// ```
/// # use supergraph_composition::{CompositionConfig, EnumMergePolicy, OutputOrdering};
/// let config = CompositionConfig::from_toml_str(r#"
///     enum_merge_policy = "intersection"
///     output_ordering = "first_seen"
/// "#).unwrap();
///
/// assert_eq!(config.enum_merge_policy, EnumMergePolicy::Intersection);
/// assert_eq!(config.output_ordering, OutputOrdering::FirstSeen);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositionConfig {
    pub enum_merge_policy: EnumMergePolicy,
    pub output_ordering: OutputOrdering,
}

impl CompositionConfig {
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }
}

/// How the values of an enum defined in several subgraphs are merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumMergePolicy {
    /// A value defined in any subgraph is in the supergraph.
    #[default]
    Union,
    /// Only the values defined in every subgraph are in the supergraph.
    Intersection,
}

/// The order of types, fields, enum values, union members and subgraphs in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputOrdering {
    /// Sorted by name. The output does not depend on the order subgraphs are ingested in.
    #[default]
    Lexical,
    /// In the order elements are first declared.
    FirstSeen,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid composition configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = CompositionConfig::from_toml_str("").unwrap();
        assert_eq!(config, CompositionConfig::default());
        assert_eq!(config.enum_merge_policy, EnumMergePolicy::Union);
        assert_eq!(config.output_ordering, OutputOrdering::Lexical);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CompositionConfig::from_toml_str("enum_policy = \"union\"").unwrap_err();
        assert!(err.to_string().starts_with("invalid composition configuration"), "{err}");
    }

    #[test]
    fn unknown_policies_are_rejected() {
        assert!(CompositionConfig::from_toml_str("enum_merge_policy = \"both\"").is_err());
    }
}
