mod arguments;
mod context;
mod directives;
mod entity_interface;
mod enums;
mod fields;
mod input_object;
mod interface;
mod object;
mod scalar;
mod union;

pub(crate) use self::context::ComposeContext;

use self::directives::merge_directives;
use crate::{
    subgraphs::{DefinitionKind, DefinitionWalker, FieldWalker, StringId},
    DiagnosticCode,
};
use indexmap::IndexMap;
use itertools::Itertools;
use supergraph as federated;

/// How a group of same-named definitions is merged.
#[derive(Debug, Clone, Copy, PartialEq)]
enum GroupKind {
    Uniform(DefinitionKind),
    /// An interface with `@key` in some subgraphs, possibly with `@interfaceObject` objects in
    /// others.
    EntityInterface,
}

pub(crate) fn compose_subgraphs(ctx: &mut ComposeContext<'_>) {
    let subgraphs = ctx.subgraphs;
    let groups = subgraphs.definition_groups();
    let mut composite_groups = Vec::new();
    let mut entity_interfaces = Vec::new();

    for definitions in &groups {
        let Some(kind) = resolve_group_kind(ctx, definitions) else {
            continue;
        };

        match kind {
            GroupKind::Uniform(DefinitionKind::Object) => {
                object::merge_object_definitions(ctx, definitions);
                composite_groups.push(definitions.as_slice());
            }
            GroupKind::Uniform(DefinitionKind::Interface) => {
                interface::merge_interface_definitions(ctx, definitions);
                composite_groups.push(definitions.as_slice());
            }
            GroupKind::EntityInterface => {
                interface::merge_interface_definitions(ctx, definitions);
                composite_groups.push(definitions.as_slice());
                entity_interfaces.push(definitions.as_slice());
            }
            GroupKind::Uniform(DefinitionKind::Union) => union::merge_union_definitions(ctx, definitions),
            GroupKind::Uniform(DefinitionKind::Enum) => enums::merge_enum_definitions(ctx, definitions),
            GroupKind::Uniform(DefinitionKind::InputObject) => {
                input_object::merge_input_object_definitions(ctx, definitions)
            }
            GroupKind::Uniform(DefinitionKind::Scalar) => scalar::merge_scalar_definitions(ctx, definitions),
        }
    }

    tracing::debug!(
        groups = groups.len(),
        types = ctx.graph().types.len(),
        "merged type definitions"
    );

    for definitions in composite_groups {
        fields::merge_fields(ctx, definitions);
    }

    tracing::debug!("merged fields");

    for definitions in &entity_interfaces {
        entity_interface::validate_entity_interface(ctx, definitions);
    }

    for definitions in entity_interfaces {
        entity_interface::expand_entity_interface(ctx, definitions);
    }

    let root_type = |name: &str| ctx.merged_type(name).map(|definition| definition.name.clone());
    let root_operation_types = federated::RootOperationTypes {
        query: root_type("Query"),
        mutation: root_type("Mutation"),
        subscription: root_type("Subscription"),
    };
    ctx.set_root_operation_types(root_operation_types);
}

fn resolve_group_kind(ctx: &mut ComposeContext<'_>, definitions: &[DefinitionWalker<'_>]) -> Option<GroupKind> {
    let first = definitions.first()?;

    if definitions.iter().all(|definition| definition.kind() == first.kind()) {
        let interface_objects = definitions
            .iter()
            .filter(|definition| definition.kind() == DefinitionKind::Object && definition.is_interface_object())
            .collect::<Vec<_>>();

        if !interface_objects.is_empty() {
            let message = format!(
                "Type \"{}\" is declared with @interfaceObject in {} but is not defined as an interface in any subgraph.",
                first.name().as_str(),
                describe_subgraphs(interface_objects.iter().map(|definition| definition.subgraph().name().as_str())),
            );

            ctx.push_error(DiagnosticCode::InterfaceObjectUsageError, message)
                .at_all(interface_objects.iter().map(|definition| definition.location()));
            return None;
        }

        let is_keyed_interface = first.kind() == DefinitionKind::Interface
            && definitions.iter().any(|definition| definition.is_entity());

        if is_keyed_interface {
            return Some(GroupKind::EntityInterface);
        }

        return Some(GroupKind::Uniform(first.kind()));
    }

    let is_entity_interface = definitions.iter().all(|definition| match definition.kind() {
        DefinitionKind::Interface => true,
        DefinitionKind::Object => definition.is_interface_object(),
        _ => false,
    });

    if is_entity_interface {
        return Some(GroupKind::EntityInterface);
    }

    let kinds = definitions
        .iter()
        .into_group_map_by(|definition| definition.kind())
        .into_iter()
        .sorted_by_key(|(_, definitions)| definitions[0].id)
        .map(|(kind, definitions)| {
            format!(
                "{} in {}",
                kind.describe(),
                describe_subgraphs(definitions.iter().map(|definition| definition.subgraph().name().as_str()))
            )
        })
        .collect::<Vec<_>>();

    let message = format!(
        "Type \"{}\" has mismatched kind: it is defined as {}",
        first.name().as_str(),
        kinds.join(" but "),
    );

    ctx.push_error(DiagnosticCode::TypeKindMismatch, message)
        .at_all(definitions.iter().map(|definition| definition.location()));

    None
}

/// `subgraph "a"`, `subgraphs "a" and "b"`, `subgraphs "a", "b" and "c"`.
pub(crate) fn describe_subgraphs<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let names = names.into_iter().map(|name| format!("\"{name}\"")).collect::<Vec<_>>();

    match names.as_slice() {
        [] => String::from("no subgraph"),
        [name] => format!("subgraph {name}"),
        [init @ .., last] => format!("subgraphs {} and {last}", init.join(", ")),
    }
}

/// Definitions in the order they were ingested.
fn in_ingestion_order<'a>(definitions: &[DefinitionWalker<'a>]) -> Vec<DefinitionWalker<'a>> {
    let mut definitions = definitions.to_vec();
    definitions.sort_by_key(|definition| definition.id);
    definitions
}

/// The fields of the definitions grouped by name. Groups are in first-seen order, fields within
/// a group are sorted by subgraph name.
fn field_groups<'a>(definitions: &[DefinitionWalker<'a>]) -> IndexMap<StringId, Vec<FieldWalker<'a>>> {
    let mut groups: IndexMap<StringId, Vec<FieldWalker<'a>>> = IndexMap::new();

    for definition in in_ingestion_order(definitions) {
        for field in definition.fields() {
            groups.entry(field.name().id).or_default().push(field);
        }
    }

    for fields in groups.values_mut() {
        fields.sort_by_key(|field| field.subgraph().name().as_str());
    }

    groups
}

/// The join entries of a type: one per key in each subgraph, or a single keyless entry.
fn join_types(definitions: &[DefinitionWalker<'_>]) -> Vec<federated::JoinType> {
    let mut join_types = Vec::new();

    for definition in definitions {
        let join_type = |key: Option<String>, resolvable: bool| federated::JoinType {
            subgraph_id: definition.subgraph_id().federated(),
            key,
            resolvable,
            extension: definition.is_extension(),
            is_interface_object: definition.is_interface_object(),
        };

        let keys = definition
            .keys()
            .map(|key| join_type(Some(key.normalized().as_str().to_owned()), key.is_resolvable()))
            .collect::<Vec<_>>();

        if keys.is_empty() {
            join_types.push(join_type(None, true));
        } else {
            join_types.extend(keys);
        }
    }

    join_types
}

fn first_description(definitions: &[DefinitionWalker<'_>]) -> Option<String> {
    definitions
        .iter()
        .find_map(|definition| definition.description())
        .map(|description| description.as_str().to_owned())
}

/// The type definition shared by all kinds: description, directives and join entries.
fn new_type_definition(definitions: &[DefinitionWalker<'_>], kind: federated::TypeKind) -> Option<federated::TypeDefinition> {
    let first = definitions.first()?;
    let mut definition = federated::TypeDefinition::new(first.name().as_str().to_owned(), kind);

    definition.description = first_description(definitions);
    definition.directives = merge_directives(definitions.iter().map(|definition| definition.directives()));
    definition.join_types = join_types(definitions);

    Some(definition)
}
