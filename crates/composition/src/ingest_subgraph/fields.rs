use super::*;
use crate::subgraphs::{Argument, FieldIngest, FieldType};

/// Whether a type reference appears in output position (fields of objects and interfaces) or
/// input position (arguments, input object fields).
#[derive(Clone, Copy, PartialEq)]
enum Position {
    Output,
    Input,
}

pub(super) fn ingest_field(
    ctx: &mut IngestContext<'_>,
    parent_definition_id: DefinitionId,
    field: &Positioned<ast::FieldDefinition>,
    block_is_shareable: bool,
) {
    let parent_name = ctx.subgraphs.walk(parent_definition_id).name().as_str().to_owned();
    let name = field.node.name.node.as_str();

    // Subgraph protocol fields.
    if parent_name == "Query" && (name == "_entities" || name == "_service") {
        return;
    }

    let coordinate = format!("{parent_name}.{name}");

    let Some(r#type) = ingest_type_reference(ctx, &field.node.ty.node, Position::Output, &coordinate, field.pos) else {
        return;
    };

    let directives = ctx.subgraphs.new_directive_site();
    ingest_directives(ctx, directives, DirectiveTarget::Field, &field.node.directives, &coordinate);

    let arguments = field
        .node
        .arguments
        .iter()
        .filter_map(|argument| ingest_argument(ctx, &coordinate, argument))
        .collect();

    let is_shareable =
        block_is_shareable || ctx.schema.is_federation_v1() || ctx.subgraphs.walk(directives).shareable();

    let result = ctx.subgraphs.push_field(FieldIngest {
        parent_definition_id,
        name,
        r#type,
        description: field.node.description.as_ref().map(|description| description.node.as_str()),
        directives,
        is_shareable,
        default: None,
        arguments,
        pos: field.pos,
    });

    if let Err(message) = result {
        ctx.push_error(DiagnosticCode::InvalidGraphql, message, coordinate, Some(field.pos));
    }
}

pub(super) fn ingest_input_field(
    ctx: &mut IngestContext<'_>,
    parent_definition_id: DefinitionId,
    field: &Positioned<ast::InputValueDefinition>,
) {
    let parent_name = ctx.subgraphs.walk(parent_definition_id).name().as_str().to_owned();
    let name = field.node.name.node.as_str();
    let coordinate = format!("{parent_name}.{name}");

    let Some(r#type) = ingest_type_reference(ctx, &field.node.ty.node, Position::Input, &coordinate, field.pos) else {
        return;
    };

    let directives = ctx.subgraphs.new_directive_site();
    ingest_directives(ctx, directives, DirectiveTarget::Field, &field.node.directives, &coordinate);

    let result = ctx.subgraphs.push_field(FieldIngest {
        parent_definition_id,
        name,
        r#type,
        description: field.node.description.as_ref().map(|description| description.node.as_str()),
        directives,
        is_shareable: true,
        default: field.node.default_value.as_ref().map(|value| value.node.to_string()),
        arguments: Vec::new(),
        pos: field.pos,
    });

    if let Err(message) = result {
        ctx.push_error(DiagnosticCode::InvalidGraphql, message, coordinate, Some(field.pos));
    }
}

fn ingest_argument(
    ctx: &mut IngestContext<'_>,
    field_coordinate: &str,
    argument: &Positioned<ast::InputValueDefinition>,
) -> Option<Argument> {
    let name = argument.node.name.node.as_str();
    let coordinate = format!("{field_coordinate}({name}:)");
    let r#type = ingest_type_reference(ctx, &argument.node.ty.node, Position::Input, &coordinate, argument.pos)?;

    let directives = ctx.subgraphs.new_directive_site();
    ingest_directives(ctx, directives, DirectiveTarget::Argument, &argument.node.directives, &coordinate);

    let default = argument
        .node
        .default_value
        .as_ref()
        .map(|value| ctx.subgraphs.strings.intern(&value.node.to_string()));

    let description = argument
        .node
        .description
        .as_ref()
        .map(|description| ctx.subgraphs.strings.intern(&description.node));

    Some(Argument {
        name: ctx.subgraphs.strings.intern(name),
        r#type,
        default,
        description,
        directives,
        pos: argument.pos,
    })
}

/// The named type must be built in or defined in the subgraph, and fit the position.
fn ingest_type_reference(
    ctx: &mut IngestContext<'_>,
    ty: &ast::Type,
    position: Position,
    coordinate: &str,
    pos: Pos,
) -> Option<FieldType> {
    let schema = ctx.schema;
    let Some(r#type) = ctx.subgraphs.intern_field_type(ty, |name| schema.normalize_type_name(name)) else {
        let message = format!(
            "`{coordinate}` nests more than {} lists in its type",
            supergraph::MAX_LIST_DEPTH
        );
        ctx.push_error(DiagnosticCode::InvalidGraphql, message, coordinate.to_owned(), Some(pos));
        return None;
    };
    let type_name = ctx.subgraphs.walk(r#type.name).as_str();

    if supergraph::BUILTIN_SCALARS.contains(&type_name) {
        return Some(r#type);
    }

    let kind = ctx
        .subgraphs
        .definition_by_name_id(r#type.name, ctx.subgraph_id)
        .map(|definition| definition.kind());

    let problem = match (kind, position) {
        (None, _) => "which is not defined in the subgraph",
        (Some(DefinitionKind::Object | DefinitionKind::Interface | DefinitionKind::Union), Position::Input) => {
            "which is not an input type"
        }
        (Some(DefinitionKind::InputObject), Position::Output) => "which is not an output type",
        (Some(_), _) => return Some(r#type),
    };

    let message = format!("`{coordinate}` has type `{type_name}`, {problem}");
    ctx.push_error(DiagnosticCode::InvalidGraphql, message, coordinate.to_owned(), Some(pos));

    None
}
