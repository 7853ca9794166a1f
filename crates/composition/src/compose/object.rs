use super::*;

pub(super) fn merge_object_definitions(ctx: &mut ComposeContext<'_>, definitions: &[DefinitionWalker<'_>]) {
    let composite = composite_from_definitions(definitions);

    if let Some(definition) = new_type_definition(definitions, federated::TypeKind::Object(composite)) {
        ctx.insert_type(definition);
    }
}

/// Implemented interfaces are the union of the interfaces implemented in each subgraph. Fields
/// are merged in a later pass.
pub(super) fn composite_from_definitions(definitions: &[DefinitionWalker<'_>]) -> federated::Composite {
    let mut composite = federated::Composite::default();

    for definition in in_ingestion_order(definitions) {
        for interface in definition.implements() {
            composite.implements_interfaces.insert(interface.as_str().to_owned());
        }
    }

    for definition in definitions {
        composite
            .join_implements
            .extend(definition.implements().map(|interface| federated::JoinImplements {
                subgraph_id: definition.subgraph_id().federated(),
                interface: interface.as_str().to_owned(),
            }));
    }

    composite
}
