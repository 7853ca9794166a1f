use super::*;
use std::collections::BTreeSet;

/// An interface with `@key` in the subgraphs owning it, and `@interfaceObject` objects in the
/// subgraphs contributing fields to it without knowing its implementers.
pub(super) fn validate_entity_interface(ctx: &mut ComposeContext<'_>, definitions: &[DefinitionWalker<'_>]) {
    let Some(first) = definitions.first() else {
        return;
    };
    let subgraphs = ctx.subgraphs;
    let interface_name = first.name();

    let keyed_interfaces: Vec<DefinitionWalker<'_>> = definitions
        .iter()
        .copied()
        .filter(|definition| definition.kind() == DefinitionKind::Interface && definition.is_entity())
        .collect();

    let Some(reference_interface) = keyed_interfaces.first().copied() else {
        let message = format!(
            "Type \"{}\" is declared with @interfaceObject in {} but the interface is not an entity (it has no @key) in any \
             subgraph.",
            interface_name.as_str(),
            describe_subgraphs(interface_objects(definitions).map(|definition| definition.subgraph().name().as_str())),
        );

        ctx.push_error(DiagnosticCode::InterfaceObjectUsageError, message)
            .at_all(definitions.iter().map(|definition| definition.location()));
        return;
    };

    let interface_keys = key_set(reference_interface);

    // Implementers of the interface across all the subgraphs.
    let supergraph_implementers: BTreeSet<&str> = subgraphs
        .iter_definitions()
        .filter(|definition| {
            definition.kind() == DefinitionKind::Object && definition.implements_interface(interface_name.id)
        })
        .map(|definition| definition.name().as_str())
        .collect();

    for interface in &keyed_interfaces {
        let subgraph_name = interface.subgraph().name().as_str();
        let local_implementers: Vec<DefinitionWalker<'_>> = interface.implementers().collect();

        let missing: Vec<&str> = supergraph_implementers
            .iter()
            .copied()
            .filter(|name| !local_implementers.iter().any(|implementer| implementer.name().as_str() == *name))
            .collect();

        if !missing.is_empty() {
            let message = format!(
                "[{subgraph_name}] Interface type \"{}\" has a resolvable key in subgraph \"{subgraph_name}\" but that \
                 subgraph is missing some of the supergraph implementation types of \"{}\". Subgraph \"{subgraph_name}\" \
                 should define types {}.",
                interface_name.as_str(),
                interface_name.as_str(),
                missing.iter().map(|name| format!("\"{name}\"")).join(", "),
            );

            ctx.push_error(DiagnosticCode::InterfaceObjectUsageError, message)
                .at(interface.location());
        }

        for implementer in &local_implementers {
            let implementer_keys = key_set(*implementer);

            if let Some(missing_key) = key_set(*interface)
                .into_iter()
                .find(|key| !implementer_keys.contains(key))
            {
                let message = format!(
                    "[{subgraph_name}] Key @key(fields: \"{missing_key}\") on interface type \"{}\" is missing on \
                     implementation type \"{}\" in subgraph \"{subgraph_name}\".",
                    interface_name.as_str(),
                    implementer.name().as_str(),
                );

                ctx.push_error(DiagnosticCode::InterfaceObjectUsageError, message)
                    .at(implementer.location());
            }
        }
    }

    for object in interface_objects(definitions) {
        if key_set(object) != interface_keys {
            let message = format!(
                "[{}] The object type \"{}\" is annotated with @interfaceObject but does not declare the same keys as \
                 the entity interface in subgraph \"{}\".",
                object.subgraph().name().as_str(),
                object.name().as_str(),
                reference_interface.subgraph().name().as_str(),
            );

            ctx.push_error(DiagnosticCode::InterfaceObjectUsageError, message)
                .at(object.location());
        }
    }
}

/// Copy the fields contributed by `@interfaceObject` subgraphs from the merged interface to
/// every object type implementing it.
pub(super) fn expand_entity_interface(ctx: &mut ComposeContext<'_>, definitions: &[DefinitionWalker<'_>]) {
    let Some(first) = definitions.first() else {
        return;
    };
    let interface_name = first.name().as_str();
    let interface_object_subgraphs: Vec<federated::SubgraphId> = interface_objects(definitions)
        .map(|definition| definition.subgraph_id().federated())
        .collect();

    let Some(interface) = ctx.merged_type(interface_name) else {
        return;
    };

    let contributed_fields: Vec<federated::Field> = interface
        .fields()
        .into_iter()
        .flat_map(|fields| fields.values())
        .filter(|field| {
            field
                .join_fields
                .iter()
                .any(|join_field| interface_object_subgraphs.contains(&join_field.subgraph_id))
        })
        .map(|field| {
            let mut field = field.clone();
            field
                .join_fields
                .retain(|join_field| interface_object_subgraphs.contains(&join_field.subgraph_id));
            field.origin = federated::FieldOrigin::InterfaceObject {
                interface: interface_name.to_owned(),
            };
            field
        })
        .collect();

    let additions: Vec<(String, federated::Field)> = ctx
        .graph()
        .concrete_implementers(interface_name)
        .flat_map(|implementer| {
            contributed_fields
                .iter()
                .filter(|field| implementer.field(&field.name).is_none())
                .map(|field| (implementer.name.clone(), field.clone()))
        })
        .collect();

    tracing::debug!(
        interface = interface_name,
        fields = contributed_fields.len(),
        added = additions.len(),
        "expanded entity interface"
    );

    for (implementer_name, field) in additions {
        if let Some(composite) = ctx
            .merged_type_mut(&implementer_name)
            .and_then(|definition| definition.kind.as_composite_mut())
        {
            composite.fields.insert(field.name.clone(), field);
        }
    }
}

fn interface_objects<'a, 'b>(
    definitions: &'b [DefinitionWalker<'a>],
) -> impl Iterator<Item = DefinitionWalker<'a>> + 'b {
    definitions
        .iter()
        .copied()
        .filter(|definition| definition.kind() == DefinitionKind::Object && definition.is_interface_object())
}

fn key_set(definition: DefinitionWalker<'_>) -> BTreeSet<&str> {
    definition.keys().map(|key| key.normalized().as_str()).collect()
}
