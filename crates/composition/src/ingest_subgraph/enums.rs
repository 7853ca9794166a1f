use super::*;

pub(super) fn ingest_enum_value(
    ctx: &mut IngestContext<'_>,
    definition_id: DefinitionId,
    value: &Positioned<ast::EnumValueDefinition>,
) {
    let enum_name = ctx.subgraphs.walk(definition_id).name().as_str().to_owned();
    let value_name = value.node.value.node.as_str();
    let coordinate = format!("{enum_name}.{value_name}");

    let directives = ctx.subgraphs.new_directive_site();
    ingest_directives(ctx, directives, DirectiveTarget::EnumValue, &value.node.directives, &coordinate);

    let description = value.node.description.as_ref().map(|description| description.node.as_str());

    if let Err(message) = ctx
        .subgraphs
        .push_enum_value(definition_id, value_name, description, directives, value.pos)
    {
        ctx.push_error(DiagnosticCode::InvalidGraphql, message, coordinate, Some(value.pos));
    }
}
