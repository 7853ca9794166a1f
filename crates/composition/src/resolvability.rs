//! Checks that every accessible field of the merged graph can be resolved from every place a
//! query can reach its parent type.
//!
//! The walk starts at the root fields of each subgraph. A state is a type definition in one
//! subgraph, plus the selection provided by the field leading there (`@provides`). In each state,
//! the subgraphs reachable through entity keys are computed first, then every field of the merged
//! type must be resolved by one of them.

use crate::{
    subgraphs::{find_selection, DefinitionKind, DefinitionWalker, FieldWalker, Selection, StringId, Subgraphs},
    DiagnosticCode, Diagnostics, Location,
};
use std::collections::{HashSet, VecDeque};
use supergraph::{self as federated, FederatedGraph};

#[derive(Clone, Copy)]
struct State<'a> {
    definition: DefinitionWalker<'a>,
    provides: Option<&'a [Selection]>,
    /// The root field the state was reached from.
    entry: FieldWalker<'a>,
}

struct Checker<'a, 'b> {
    subgraphs: &'a Subgraphs,
    graph: &'a FederatedGraph,
    diagnostics: &'b mut Diagnostics,
    queue: VecDeque<State<'a>>,
    visited: HashSet<(StringId, crate::subgraphs::SubgraphId, Option<&'a [Selection]>)>,
    reported: HashSet<String>,
}

pub(crate) fn check_resolvability(subgraphs: &Subgraphs, graph: &FederatedGraph, diagnostics: &mut Diagnostics) {
    let mut checker = Checker {
        subgraphs,
        graph,
        diagnostics,
        queue: VecDeque::new(),
        visited: HashSet::new(),
        reported: HashSet::new(),
    };

    for subgraph in subgraphs.iter_subgraphs() {
        for root in subgraph.root_types() {
            for field in root.fields() {
                if field.is_external() || is_inaccessible_field(graph, field) {
                    continue;
                }

                if let Some(definition) = field.type_definition() {
                    checker.push(State {
                        definition,
                        provides: field.directives().provides().map(|provides| provides.selection_set.as_slice()),
                        entry: field,
                    });
                }
            }
        }
    }

    let mut states = 0;

    while let Some(state) = checker.queue.pop_front() {
        states += 1;
        checker.visit(state);
    }

    tracing::debug!(states, unresolvable = checker.reported.len(), "checked resolvability");
}

impl<'a> Checker<'a, '_> {
    fn push(&mut self, state: State<'a>) {
        let key = (state.definition.name().id, state.definition.subgraph_id(), state.provides);

        if self.visited.insert(key) {
            self.queue.push_back(state);
        }
    }

    fn visit(&mut self, state: State<'a>) {
        let graph = self.graph;
        let Some(merged) = graph.type_definition(state.definition.name().as_str()) else {
            return;
        };

        if merged.is_inaccessible() {
            return;
        }

        match &merged.kind {
            federated::TypeKind::Union(_) => {
                for member in state.definition.union_members() {
                    if let Some(member) = state.definition.subgraph().definition_by_name(member.as_str()) {
                        self.push(State { definition: member, ..state });
                    }
                }
            }
            federated::TypeKind::Interface(composite) => {
                // An interface object does not know the implementers.
                if state.definition.kind() == DefinitionKind::Interface {
                    for implementer in state.definition.implementers() {
                        self.push(State {
                            definition: implementer,
                            ..state
                        });
                    }
                }

                self.check_fields(state, merged, composite);
            }
            federated::TypeKind::Object(composite) => self.check_fields(state, merged, composite),
            federated::TypeKind::InputObject(_) | federated::TypeKind::Enum(_) | federated::TypeKind::Scalar => (),
        }
    }

    fn check_fields(&mut self, state: State<'a>, merged: &federated::TypeDefinition, composite: &federated::Composite) {
        let reachable = self.key_closure(state, composite);

        for merged_field in composite.fields.values() {
            if merged_field.is_inaccessible() {
                continue;
            }

            let mut resolved = false;

            for (idx, definition) in reachable.iter().enumerate() {
                let provides = if idx == 0 { state.provides } else { None };

                let Some(field) = definition.field_by_name_str(&merged_field.name) else {
                    continue;
                };

                let provided = provides.and_then(|provides| find_selection(provides, field.name().id));

                if !is_locally_resolvable(*definition, field, provided) {
                    continue;
                }

                resolved = true;

                let Some(next) = field.type_definition() else {
                    continue;
                };

                let provides = field
                    .directives()
                    .provides()
                    .map(|provides| provides.selection_set.as_slice())
                    .or(provided.map(|provided| provided.subselection.as_slice()))
                    .filter(|selection_set| !selection_set.is_empty());

                self.push(State {
                    definition: next,
                    provides,
                    entry: state.entry,
                });
            }

            if !resolved {
                self.report(state, merged, merged_field);
            }
        }
    }

    /// The definitions of the type reachable from the state through resolvable keys, starting with
    /// the state's own. Implemented entity interfaces are reachable through their interface
    /// objects.
    fn key_closure(&self, state: State<'a>, composite: &federated::Composite) -> Vec<DefinitionWalker<'a>> {
        let subgraphs = self.subgraphs;
        let mut candidates: Vec<DefinitionWalker<'a>> = subgraphs
            .definitions_named(state.definition.name().id)
            .filter(|definition| definition.kind().is_composite())
            .collect();

        for interface in &composite.implements_interfaces {
            let Some(interface) = subgraphs.strings.lookup(interface) else {
                continue;
            };

            candidates.extend(
                subgraphs
                    .definitions_named(interface)
                    .filter(|definition| definition.kind() == DefinitionKind::Object && definition.is_interface_object()),
            );
        }

        let mut reachable = vec![state.definition];
        let mut idx = 0;

        while let Some(current) = reachable.get(idx).copied() {
            let provides = if idx == 0 { state.provides } else { None };

            for candidate in &candidates {
                if reachable.iter().any(|reached| reached.id == candidate.id) {
                    continue;
                }

                let enterable = candidate.keys().any(|key| {
                    key.is_resolvable() && is_selection_resolvable(current, &key.fields().selection_set, provides)
                });

                if enterable {
                    reachable.push(*candidate);
                }
            }

            idx += 1;
        }

        reachable
    }

    fn report(&mut self, state: State<'a>, merged: &federated::TypeDefinition, field: &federated::Field) {
        let coordinate = format!("{}.{}", merged.name, field.name);

        if !self.reported.insert(coordinate.clone()) {
            return;
        }

        let entry = state.entry;
        let entry_subgraph = entry.subgraph().name().as_str();
        let subgraph = state.definition.subgraph().name().as_str();

        let message = format!(
            "Subgraph \"{entry_subgraph}\" defines {} → {}, but {coordinate} is not resolvable in subgraph \
             \"{subgraph}\" and no key path exists to a subgraph that resolves it",
            entry.coordinate(),
            self.subgraphs.walk(entry.r#type().name).as_str(),
        );

        tracing::trace!(field = %coordinate, subgraph, "unresolvable field");

        self.diagnostics
            .push_fatal(DiagnosticCode::UnresolvableFieldError, message)
            .at(entry.location())
            .at(Location::new(subgraph, coordinate, None));
    }
}

fn is_inaccessible_field(graph: &FederatedGraph, field: FieldWalker<'_>) -> bool {
    graph
        .type_definition(field.parent_definition().name().as_str())
        .and_then(|definition| definition.field(field.name().as_str()))
        .is_some_and(federated::Field::is_inaccessible)
}

/// Defined in the subgraph, and not external unless provided. Key fields of the definition
/// always come with the entity representation.
fn is_locally_resolvable(definition: DefinitionWalker<'_>, field: FieldWalker<'_>, provided: Option<&Selection>) -> bool {
    !field.is_external() || provided.is_some() || definition.is_key_field(field.name().id)
}

fn is_selection_resolvable(
    definition: DefinitionWalker<'_>,
    selection_set: &[Selection],
    provides: Option<&[Selection]>,
) -> bool {
    selection_set.iter().all(|selection| {
        let Some(field) = definition.field_by_name(selection.field) else {
            return false;
        };

        let provided = provides.and_then(|provides| find_selection(provides, selection.field));

        if !is_locally_resolvable(definition, field, provided) {
            return false;
        }

        if selection.subselection.is_empty() {
            return true;
        }

        field.type_definition().is_some_and(|field_type| {
            is_selection_resolvable(
                field_type,
                &selection.subselection,
                provided.map(|provided| provided.subselection.as_slice()),
            )
        })
    })
}

#[cfg(test)]
mod tests {
    use crate::{compose, DiagnosticCode, Subgraphs};

    fn compose_codes(sdls: &[(&str, &str)]) -> Vec<DiagnosticCode> {
        let mut subgraphs = Subgraphs::default();

        for (name, sdl) in sdls {
            subgraphs.ingest_str(sdl, name, None).unwrap();
        }

        compose(&subgraphs).diagnostics().codes()
    }

    const LINK: &str = r#"extend schema @link(url: "https://specs.apollo.dev/federation/v2.3", import: ["@key", "@shareable", "@external", "@provides", "@inaccessible"])"#;

    #[test]
    fn entity_keys_lead_to_other_subgraphs() {
        let products = format!(
            "{LINK}\ntype Query {{ products: [Product!]! }}\ntype Product @key(fields: \"id\") {{ id: ID! name: String }}"
        );
        let prices = format!("{LINK}\ntype Product @key(fields: \"id\") {{ id: ID! price: Int }}");

        assert_eq!(compose_codes(&[("products", &products), ("prices", &prices)]), []);
    }

    #[test]
    fn unreachable_value_type_field() {
        let a = format!("{LINK}\ntype Query {{ currentPosition: Position! }}\ntype Position @shareable {{ x: Int! y: Int! }}");
        let b = format!("{LINK}\ntype Position @shareable {{ x: Int! y: Int! z: Int! }}");

        assert_eq!(
            compose_codes(&[("a", &a), ("b", &b)]),
            [DiagnosticCode::UnresolvableFieldError]
        );
    }

    #[test]
    fn non_resolvable_keys_are_not_entry_points() {
        let reviews = format!(
            "{LINK}\ntype Query {{ reviews: [Review!]! }}\ntype Review {{ body: String product: Product }}\n\
             type Product @key(fields: \"id\", resolvable: false) {{ id: ID! }}"
        );
        let products = format!("{LINK}\ntype Product @key(fields: \"id\", resolvable: false) {{ id: ID! name: String }}");

        assert_eq!(
            compose_codes(&[("reviews", &reviews), ("products", &products)]),
            [DiagnosticCode::UnresolvableFieldError]
        );
    }

    #[test]
    fn provided_external_fields() {
        let reviews = format!(
            "{LINK}\ntype Query {{ reviews: [Review!]! }}\n\
             type Review {{ body: String author: User @provides(fields: \"name\") }}\n\
             type User {{ id: ID! @shareable name: String @external }}"
        );
        let users = format!("{LINK}\ntype User {{ id: ID! @shareable name: String @shareable }}");

        assert_eq!(compose_codes(&[("reviews", &reviews), ("users", &users)]), []);
    }
}
