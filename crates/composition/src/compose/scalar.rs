use super::*;

pub(super) fn merge_scalar_definitions(ctx: &mut ComposeContext<'_>, definitions: &[DefinitionWalker<'_>]) {
    if let Some(definition) = new_type_definition(definitions, federated::TypeKind::Scalar) {
        ctx.insert_type(definition);
    }
}
