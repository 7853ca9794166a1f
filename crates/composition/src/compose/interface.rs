use super::*;

pub(super) fn merge_interface_definitions(ctx: &mut ComposeContext<'_>, definitions: &[DefinitionWalker<'_>]) {
    for definition in definitions {
        if definition.kind() == DefinitionKind::Interface && definition.is_interface_object() {
            let message = format!(
                "[{}] The @interfaceObject directive is not valid on interfaces (on \"{}\").",
                definition.subgraph().name().as_str(),
                definition.name().as_str(),
            );

            ctx.push_error(DiagnosticCode::InterfaceObjectUsageError, message)
                .at(definition.location());
        }
    }

    let composite = object::composite_from_definitions(definitions);

    if let Some(definition) = new_type_definition(definitions, federated::TypeKind::Interface(composite)) {
        ctx.insert_type(definition);
    }
}
