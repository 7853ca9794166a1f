use super::*;
use std::collections::BTreeSet;

/// Directives that survive composition on any element of the graph.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Directives {
    pub inaccessible: bool,
    pub tags: BTreeSet<String>,
    pub deprecated: Option<Deprecated>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Deprecated {
    pub reason: Option<String>,
}

/// `@join__type`: one per subgraph defining the type, and per key.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct JoinType {
    pub subgraph_id: SubgraphId,
    /// The `@key(fields:)` selection, normalized.
    pub key: Option<String>,
    pub resolvable: bool,
    pub extension: bool,
    pub is_interface_object: bool,
}

/// `@join__field`: one per subgraph defining the field.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct JoinField {
    pub subgraph_id: SubgraphId,
    /// The type of the field in that subgraph, when it differs from the merged type.
    pub r#type: Option<Type>,
    pub external: bool,
    pub shareable: bool,
    pub requires: Option<String>,
    pub provides: Option<String>,
    pub override_from: Option<String>,
}

impl JoinField {
    pub fn new(subgraph_id: SubgraphId) -> Self {
        JoinField {
            subgraph_id,
            r#type: None,
            external: false,
            shareable: false,
            requires: None,
            provides: None,
            override_from: None,
        }
    }
}

/// `@join__implements`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub struct JoinImplements {
    pub subgraph_id: SubgraphId,
    pub interface: String,
}
