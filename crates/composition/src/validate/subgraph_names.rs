use super::*;
use crate::Location;
use std::collections::HashSet;

pub(super) fn validate_subgraph_names(ctx: &mut ValidateContext<'_>) {
    let mut seen = HashSet::new();
    let subgraphs = ctx.subgraphs;

    for subgraph in subgraphs.iter_subgraphs() {
        let name = subgraph.name().as_str();

        let problem = if name.trim().is_empty() {
            "subgraph names cannot be empty"
        } else if name == "_" {
            "`_` is reserved"
        } else if !seen.insert(name) {
            "another subgraph has the same name"
        } else {
            continue;
        };

        ctx.push_error(
            DiagnosticCode::InvalidSubgraphName,
            format!("Invalid subgraph name \"{name}\": {problem}."),
        )
        .at(Location::new(name, String::new(), None));
    }
}
