//! Rules that need the whole merged graph: external definitions without a base, interface
//! implementations, `@inaccessible` consistency and `@override` sources.

use crate::{
    compose::describe_subgraphs,
    subgraphs::{FieldWalker, StringId, Subgraphs},
    DiagnosticCode, Diagnostics, Location,
};
use indexmap::IndexMap;
use supergraph::{self as federated, FederatedGraph};

pub(crate) fn run_global_checks(subgraphs: &Subgraphs, graph: &FederatedGraph, diagnostics: &mut Diagnostics) {
    let field_groups = output_field_groups(subgraphs);

    for fields in field_groups.values() {
        check_external_missing_on_base(fields, diagnostics);
        check_overrides(subgraphs, fields, diagnostics);
    }

    check_interface_implementations(graph, diagnostics);
    inaccessible::check_inaccessible(graph, diagnostics);

    tracing::debug!(fields = field_groups.len(), "ran global checks");
}

/// Fields of objects and interfaces, grouped by parent type name and field name.
fn output_field_groups(subgraphs: &Subgraphs) -> IndexMap<(StringId, StringId), Vec<FieldWalker<'_>>> {
    let mut groups: IndexMap<(StringId, StringId), Vec<FieldWalker<'_>>> = IndexMap::new();

    for field in subgraphs.iter_fields() {
        let parent = field.parent_definition();

        if parent.kind().is_composite() {
            groups.entry((parent.name().id, field.name().id)).or_default().push(field);
        }
    }

    groups
}

fn check_external_missing_on_base(fields: &[FieldWalker<'_>], diagnostics: &mut Diagnostics) {
    let Some(first) = fields.first() else {
        return;
    };

    if !fields.iter().all(|field| field.is_external()) {
        return;
    }

    let message = format!(
        "Field \"{}\" is marked @external on all the subgraphs in which it is listed ({}).",
        first.coordinate(),
        describe_subgraphs(fields.iter().map(|field| field.subgraph().name().as_str())),
    );

    diagnostics
        .push_fatal(DiagnosticCode::ExternalMissingOnBase, message)
        .at_all(fields.iter().map(|field| field.location()));
}

fn check_overrides(subgraphs: &Subgraphs, fields: &[FieldWalker<'_>], diagnostics: &mut Diagnostics) {
    for field in fields {
        let Some(from) = field.directives().r#override() else {
            continue;
        };

        let subgraph_name = field.subgraph().name().as_str();
        let coordinate = field.coordinate();

        if from.as_str() == subgraph_name {
            let message = format!(
                "[{subgraph_name}] Source and destination subgraphs \"{subgraph_name}\" are the same for overridden field \
                 \"{coordinate}\"."
            );

            diagnostics
                .push_fatal(DiagnosticCode::OverrideFromSelfError, message)
                .at(field.location());
            continue;
        }

        if !subgraphs
            .iter_subgraphs()
            .any(|subgraph| subgraph.name().as_str() == from.as_str())
        {
            let message = format!(
                "[{subgraph_name}] Source subgraph \"{}\" for field \"{coordinate}\" does not exist; it will be ignored.",
                from.as_str(),
            );

            diagnostics
                .push_warning(DiagnosticCode::FromSubgraphDoesNotExist, message)
                .at(field.location());
            continue;
        }

        let source_overrides = fields.iter().find(|source| {
            source.subgraph().name().as_str() == from.as_str() && source.directives().r#override().is_some()
        });

        if let Some(source) = source_overrides {
            let message = format!(
                "Field \"{coordinate}\" on subgraph \"{subgraph_name}\" is overridden from subgraph \"{}\", which itself \
                 overrides the field. Only one @override directive is allowed per field.",
                from.as_str(),
            );

            diagnostics
                .push_fatal(DiagnosticCode::OverrideSourceHasOverride, message)
                .at(field.location())
                .at(source.location());
        }
    }
}

/// After entity interface expansion, every type implementing an interface has all its fields.
fn check_interface_implementations(graph: &FederatedGraph, diagnostics: &mut Diagnostics) {
    for interface in graph.types.values() {
        let federated::TypeKind::Interface(composite) = &interface.kind else {
            continue;
        };

        for implementer in graph.implementers(&interface.name) {
            for field in composite.fields.values() {
                if implementer.field(&field.name).is_some() {
                    continue;
                }

                let message = format!(
                    "Interface field \"{}.{}\" is declared but type \"{}\", which implements \"{}\", does not have a \
                     field \"{}\".",
                    interface.name, field.name, implementer.name, interface.name, field.name,
                );

                diagnostics
                    .push_fatal(DiagnosticCode::InterfaceFieldNoImplem, message)
                    .at_all(merged_locations(graph, implementer, &implementer.name));
            }
        }
    }
}

/// A location per subgraph defining the type.
fn merged_locations(graph: &FederatedGraph, definition: &federated::TypeDefinition, coordinate: &str) -> Vec<Location> {
    definition
        .subgraph_ids()
        .map(|subgraph_id| Location::new(&graph[subgraph_id].name, coordinate.to_owned(), None))
        .collect()
}

mod inaccessible {
    use super::*;

    pub(super) fn check_inaccessible(graph: &FederatedGraph, diagnostics: &mut Diagnostics) {
        if let Some(query) = graph
            .root_operation_types
            .query
            .as_deref()
            .and_then(|query| graph.type_definition(query))
            .filter(|query| query.is_inaccessible())
        {
            let message = format!("Type \"{}\" is the query root type, which is not allowed to be @inaccessible.", query.name);

            diagnostics
                .push_fatal(DiagnosticCode::QueryRootTypeInaccessible, message)
                .at_all(merged_locations(graph, query, &query.name));
        }

        for definition in graph.types.values() {
            if definition.is_inaccessible() {
                continue;
            }

            match &definition.kind {
                federated::TypeKind::Object(composite) | federated::TypeKind::Interface(composite) => {
                    check_children(
                        graph,
                        definition,
                        "fields",
                        composite.fields.values().map(|field| field.is_inaccessible()),
                        diagnostics,
                    );

                    for field in composite.fields.values().filter(|field| !field.is_inaccessible()) {
                        let coordinate = format!("{}.{}", definition.name, field.name);
                        check_reference(graph, definition, &coordinate, &field.r#type, diagnostics);

                        for argument in field.arguments.values() {
                            let coordinate = format!("{coordinate}({}:)", argument.name);
                            check_input_value(graph, definition, &coordinate, argument, diagnostics);
                        }
                    }
                }
                federated::TypeKind::InputObject(input_object) => {
                    check_children(
                        graph,
                        definition,
                        "fields",
                        input_object.fields.values().map(|field| field.directives.inaccessible),
                        diagnostics,
                    );

                    for field in input_object.fields.values() {
                        let coordinate = format!("{}.{}", definition.name, field.name);
                        check_input_value(graph, definition, &coordinate, field, diagnostics);
                    }
                }
                federated::TypeKind::Enum(r#enum) => check_children(
                    graph,
                    definition,
                    "values",
                    r#enum.values.values().map(|value| value.directives.inaccessible),
                    diagnostics,
                ),
                federated::TypeKind::Union(union) => check_children(
                    graph,
                    definition,
                    "members",
                    union.members.keys().map(|member| {
                        graph
                            .type_definition(member)
                            .is_some_and(federated::TypeDefinition::is_inaccessible)
                    }),
                    diagnostics,
                ),
                federated::TypeKind::Scalar => (),
            }
        }
    }

    fn check_children(
        graph: &FederatedGraph,
        definition: &federated::TypeDefinition,
        children: &str,
        inaccessible: impl Iterator<Item = bool>,
        diagnostics: &mut Diagnostics,
    ) {
        let inaccessible: Vec<bool> = inaccessible.collect();

        if inaccessible.is_empty() || inaccessible.contains(&false) {
            return;
        }

        let message = format!(
            "Type \"{}\" is in the API schema but all of its {children} are @inaccessible.",
            definition.name
        );

        diagnostics
            .push_fatal(DiagnosticCode::OnlyInaccessibleChildren, message)
            .at_all(merged_locations(graph, definition, &definition.name));
    }

    /// Arguments and input fields: inaccessible ones must not be required, accessible ones must not
    /// reference inaccessible types.
    fn check_input_value(
        graph: &FederatedGraph,
        parent: &federated::TypeDefinition,
        coordinate: &str,
        input_value: &federated::InputValueDefinition,
        diagnostics: &mut Diagnostics,
    ) {
        if !input_value.directives.inaccessible {
            check_reference(graph, parent, coordinate, &input_value.r#type, diagnostics);
            return;
        }

        if input_value.is_required() {
            let message = format!(
                "Input value \"{coordinate}\" is @inaccessible but is required, with no default value, in the API \
                 schema."
            );

            diagnostics
                .push_fatal(DiagnosticCode::RequiredInaccessible, message)
                .at_all(merged_locations(graph, parent, coordinate));
        }
    }

    fn check_reference(
        graph: &FederatedGraph,
        parent: &federated::TypeDefinition,
        coordinate: &str,
        r#type: &federated::Type,
        diagnostics: &mut Diagnostics,
    ) {
        let Some(referenced) = graph.type_definition(&r#type.name) else {
            return;
        };

        if !referenced.is_inaccessible() {
            return;
        }

        let message = format!(
            "Type \"{}\" is @inaccessible but is referenced by \"{coordinate}\", which is in the API schema.",
            referenced.name
        );

        diagnostics
            .push_fatal(DiagnosticCode::ReferencedInaccessible, message)
            .at_all(merged_locations(graph, parent, coordinate));
    }
}

#[cfg(test)]
mod tests {
    use crate::{compose, DiagnosticCode, Subgraphs};

    const LINK: &str = r#"extend schema @link(url: "https://specs.apollo.dev/federation/v2.3", import: ["@key", "@shareable", "@external", "@inaccessible", "@override"])"#;

    fn compose_codes(sdls: &[(&str, String)]) -> Vec<DiagnosticCode> {
        let mut subgraphs = Subgraphs::default();

        for (name, sdl) in sdls {
            subgraphs.ingest_str(&format!("{LINK}\n{sdl}"), name, None).unwrap();
        }

        compose(&subgraphs).diagnostics().codes()
    }

    #[test]
    fn external_everywhere() {
        let codes = compose_codes(&[
            ("a", "type Query { a: Int }\ntype User @key(fields: \"id\") { id: ID! name: String @external }".to_owned()),
            ("b", "type User @key(fields: \"id\") { id: ID! name: String @external }".to_owned()),
        ]);

        assert_eq!(codes, [DiagnosticCode::ExternalMissingOnBase]);
    }

    #[test]
    fn overrides() {
        let codes = compose_codes(&[
            ("a", "type Query { a: Int @override(from: \"a\") b: Int @override(from: \"nowhere\") }".to_owned()),
            ("b", "type User @key(fields: \"id\") { id: ID! name: String @override(from: \"c\") }".to_owned()),
            ("c", "type User @key(fields: \"id\") { id: ID! name: String @override(from: \"b\") }".to_owned()),
        ]);

        assert_eq!(
            codes,
            [
                DiagnosticCode::OverrideFromSelfError,
                DiagnosticCode::FromSubgraphDoesNotExist,
                DiagnosticCode::OverrideSourceHasOverride,
                DiagnosticCode::OverrideSourceHasOverride,
            ]
        );
    }

    #[test]
    fn inaccessible_rules() {
        let codes = compose_codes(&[(
            "a",
            r#"
            type Query {
              secret: Secret
              search(filter: String! @inaccessible): [String]
              hidden: Hidden
            }
            type Secret @inaccessible { id: ID }
            type Hidden { a: Int @inaccessible b: Int @inaccessible }
            "#
            .to_owned(),
        )]);

        assert_eq!(
            codes,
            [
                DiagnosticCode::ReferencedInaccessible,
                DiagnosticCode::RequiredInaccessible,
                DiagnosticCode::OnlyInaccessibleChildren,
            ]
        );
    }

    #[test]
    fn inaccessible_query_root() {
        let codes = compose_codes(&[("a", "type Query @inaccessible { a: Int }".to_owned())]);
        assert_eq!(codes, [DiagnosticCode::QueryRootTypeInaccessible]);
    }
}
