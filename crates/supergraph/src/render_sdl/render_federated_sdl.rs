use super::display_utils::*;
use crate::{
    Composite, Directives, Field, FieldOrigin, FederatedGraph, InputValueDefinition, JoinField, JoinType, TypeDefinition,
    TypeKind,
};
use indexmap::IndexMap;
use std::fmt::{self, Write};

const DIRECTIVE_DEFINITIONS: &str = r#"directive @inaccessible on FIELD_DEFINITION | OBJECT | INTERFACE | UNION | ARGUMENT_DEFINITION | SCALAR | ENUM | ENUM_VALUE | INPUT_OBJECT | INPUT_FIELD_DEFINITION

directive @join__enumValue(graph: join__Graph!) repeatable on ENUM_VALUE

directive @join__field(graph: join__Graph, requires: join__FieldSet, provides: join__FieldSet, type: String, external: Boolean, override: String, shareable: Boolean) repeatable on FIELD_DEFINITION | INPUT_FIELD_DEFINITION

directive @join__graph(name: String!, url: String!) on ENUM_VALUE

directive @join__implements(graph: join__Graph!, interface: String!) repeatable on OBJECT | INTERFACE

directive @join__type(graph: join__Graph!, key: join__FieldSet, extension: Boolean! = false, resolvable: Boolean! = true, isInterfaceObject: Boolean! = false) repeatable on OBJECT | INTERFACE | UNION | ENUM | INPUT_OBJECT | SCALAR

directive @join__unionMember(graph: join__Graph!, member: String!) repeatable on UNION

directive @link(url: String, as: String, for: link__Purpose, import: [link__Import]) repeatable on SCHEMA

directive @tag(name: String!) repeatable on FIELD_DEFINITION | OBJECT | INTERFACE | UNION | ARGUMENT_DEFINITION | SCALAR | ENUM | ENUM_VALUE | INPUT_OBJECT | INPUT_FIELD_DEFINITION

scalar join__FieldSet

scalar link__Import

enum link__Purpose {
  """
  `SECURITY` features provide metadata necessary to securely resolve fields.
  """
  SECURITY

  """
  `EXECUTION` features provide metadata necessary for operation execution.
  """
  EXECUTION
}
"#;

/// Render the supergraph SDL: every type, field and argument of the graph, with the join
/// directives describing where each of them comes from.
pub fn render_federated_sdl(graph: &FederatedGraph) -> Result<String, fmt::Error> {
    let graph_names = graph_enum_values(graph);
    let mut out = String::new();

    write_schema_definition(graph, &mut out)?;
    out.push('\n');
    out.push_str(DIRECTIVE_DEFINITIONS);
    out.push('\n');
    write_graph_enum(graph, &graph_names, &mut out)?;

    let ctx = RenderContext {
        graph_names: &graph_names,
    };

    for definition in graph.types.values() {
        out.push('\n');
        write_type_definition(&ctx, definition, &mut out)?;
    }

    Ok(out)
}

struct RenderContext<'a> {
    graph_names: &'a [String],
}

fn write_schema_definition(graph: &FederatedGraph, out: &mut String) -> fmt::Result {
    out.push_str("schema\n");
    writeln!(out, "{INDENT}@link(url: \"https://specs.apollo.dev/link/v1.0\")")?;
    writeln!(
        out,
        "{INDENT}@link(url: \"https://specs.apollo.dev/join/v0.3\", for: EXECUTION)"
    )?;
    writeln!(
        out,
        "{INDENT}@link(url: \"https://specs.apollo.dev/inaccessible/v0.2\", for: SECURITY)"
    )?;
    writeln!(out, "{INDENT}@link(url: \"https://specs.apollo.dev/tag/v0.3\")")?;
    out.push_str("{\n");

    for (operation, type_name) in graph.root_operation_types.iter() {
        writeln!(out, "{INDENT}{operation}: {type_name}")?;
    }

    out.write_str("}\n")
}

fn write_graph_enum(graph: &FederatedGraph, graph_names: &[String], out: &mut String) -> fmt::Result {
    out.push_str("enum join__Graph {\n");

    for (subgraph, enum_value) in graph.subgraphs.iter().zip(graph_names) {
        write!(out, "{INDENT}{enum_value} @join__graph(name: ")?;
        write_string_literal(&subgraph.name, out)?;
        out.push_str(", url: ");
        write_string_literal(subgraph.url.as_deref().unwrap_or_default(), out)?;
        out.push_str(")\n");
    }

    out.write_str("}\n")
}

fn write_type_definition(ctx: &RenderContext<'_>, definition: &TypeDefinition, out: &mut String) -> fmt::Result {
    write_description(definition.description.as_deref(), "", out)?;

    let keyword = match definition.kind {
        TypeKind::Object(_) => "type",
        TypeKind::Interface(_) => "interface",
        TypeKind::Union(_) => "union",
        TypeKind::InputObject(_) => "input",
        TypeKind::Enum(_) => "enum",
        TypeKind::Scalar => "scalar",
    };

    write!(out, "{keyword} {}", definition.name)?;

    if let Some(composite) = definition.kind.as_composite() {
        write_implements(composite, out)?;
    }

    out.push('\n');

    for join_type in &definition.join_types {
        out.push_str(INDENT);
        write_join_type(ctx, join_type, out)?;
        out.push('\n');
    }

    if let Some(composite) = definition.kind.as_composite() {
        for join_implements in &composite.join_implements {
            write!(
                out,
                "{INDENT}@join__implements(graph: {}, interface: ",
                ctx.graph_names[usize::from(join_implements.subgraph_id)]
            )?;
            write_string_literal(&join_implements.interface, out)?;
            out.push_str(")\n");
        }
    }

    if let TypeKind::Union(union) = &definition.kind {
        for (member, subgraph_ids) in &union.members {
            for subgraph_id in subgraph_ids {
                write!(
                    out,
                    "{INDENT}@join__unionMember(graph: {}, member: ",
                    ctx.graph_names[usize::from(*subgraph_id)]
                )?;
                write_string_literal(member, out)?;
                out.push_str(")\n");
            }
        }
    }

    write_directives_on_lines(&definition.directives, out)?;

    match &definition.kind {
        TypeKind::Object(composite) | TypeKind::Interface(composite) => write_fields(ctx, &composite.fields, out),
        TypeKind::InputObject(input_object) => write_input_fields(ctx, &input_object.fields, out),
        TypeKind::Enum(r#enum) => {
            out.push_str("{\n");

            for value in r#enum.values.values() {
                write_description(value.description.as_deref(), INDENT, out)?;
                write!(out, "{INDENT}{}", value.name)?;

                for subgraph_id in &value.subgraph_ids {
                    write!(
                        out,
                        " @join__enumValue(graph: {})",
                        ctx.graph_names[usize::from(*subgraph_id)]
                    )?;
                }

                write_directives_inline(&value.directives, out)?;
                out.push('\n');
            }

            out.write_str("}\n")
        }
        TypeKind::Union(union) => {
            let members = union.members.keys().map(String::as_str).collect::<Vec<_>>().join(" | ");
            writeln!(out, " = {members}")
        }
        TypeKind::Scalar => Ok(()),
    }
}

fn write_implements(composite: &Composite, out: &mut String) -> fmt::Result {
    let mut interfaces = composite.implements_interfaces.iter();

    if let Some(first) = interfaces.next() {
        write!(out, " implements {first}")?;

        for interface in interfaces {
            write!(out, " & {interface}")?;
        }
    }

    Ok(())
}

fn write_join_type(ctx: &RenderContext<'_>, join_type: &JoinType, out: &mut String) -> fmt::Result {
    write!(
        out,
        "@join__type(graph: {}",
        ctx.graph_names[usize::from(join_type.subgraph_id)]
    )?;

    if let Some(key) = &join_type.key {
        out.push_str(", key: ");
        write_string_literal(key, out)?;
    }

    if join_type.extension {
        out.push_str(", extension: true");
    }

    if !join_type.resolvable {
        out.push_str(", resolvable: false");
    }

    if join_type.is_interface_object {
        out.push_str(", isInterfaceObject: true");
    }

    out.push(')');
    Ok(())
}

fn write_fields(ctx: &RenderContext<'_>, fields: &IndexMap<String, Field>, out: &mut String) -> fmt::Result {
    out.push_str("{\n");

    for field in fields.values() {
        write_description(field.description.as_deref(), INDENT, out)?;
        write!(out, "{INDENT}{}", field.name)?;
        write_arguments(ctx, field, out)?;
        write!(out, ": {}", field.r#type)?;

        match &field.origin {
            FieldOrigin::InterfaceObject { .. } => out.push_str(" @join__field"),
            FieldOrigin::Subgraphs => {
                for join_field in &field.join_fields {
                    write_join_field(ctx, join_field, out)?;
                }
            }
        }

        write_directives_inline(&field.directives, out)?;
        out.push('\n');
    }

    out.write_str("}\n")
}

fn write_arguments(ctx: &RenderContext<'_>, field: &Field, out: &mut String) -> fmt::Result {
    if field.arguments.is_empty() {
        return Ok(());
    }

    out.push('(');

    for (idx, argument) in field.arguments.values().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }

        write_input_value_definition(ctx, argument, false, out)?;
    }

    out.push(')');
    Ok(())
}

fn write_input_fields(
    ctx: &RenderContext<'_>,
    fields: &IndexMap<String, InputValueDefinition>,
    out: &mut String,
) -> fmt::Result {
    out.push_str("{\n");

    for field in fields.values() {
        write_description(field.description.as_deref(), INDENT, out)?;
        out.push_str(INDENT);
        write_input_value_definition(ctx, field, true, out)?;
        out.push('\n');
    }

    out.write_str("}\n")
}

fn write_input_value_definition(
    ctx: &RenderContext<'_>,
    definition: &InputValueDefinition,
    with_join_fields: bool,
    out: &mut String,
) -> fmt::Result {
    write!(out, "{}: {}", definition.name, definition.r#type)?;

    if let Some(default) = &definition.default {
        write!(out, " = {default}")?;
    }

    if with_join_fields {
        for subgraph_id in &definition.subgraph_ids {
            write!(
                out,
                " @join__field(graph: {})",
                ctx.graph_names[usize::from(*subgraph_id)]
            )?;
        }
    }

    write_directives_inline(&definition.directives, out)
}

fn write_join_field(ctx: &RenderContext<'_>, join_field: &JoinField, out: &mut String) -> fmt::Result {
    write!(
        out,
        " @join__field(graph: {}",
        ctx.graph_names[usize::from(join_field.subgraph_id)]
    )?;

    if let Some(requires) = &join_field.requires {
        out.push_str(", requires: ");
        write_string_literal(requires, out)?;
    }

    if let Some(provides) = &join_field.provides {
        out.push_str(", provides: ");
        write_string_literal(provides, out)?;
    }

    if let Some(r#type) = &join_field.r#type {
        out.push_str(", type: ");
        write_string_literal(&r#type.to_string(), out)?;
    }

    if join_field.external {
        out.push_str(", external: true");
    }

    if let Some(from) = &join_field.override_from {
        out.push_str(", override: ");
        write_string_literal(from, out)?;
    }

    if join_field.shareable {
        out.push_str(", shareable: true");
    }

    out.push(')');
    Ok(())
}

fn write_directives_on_lines(directives: &Directives, out: &mut String) -> fmt::Result {
    write_directives(directives, INDENT, "\n", out)
}

fn write_directives_inline(directives: &Directives, out: &mut String) -> fmt::Result {
    write_directives(directives, " ", "", out)
}

fn write_directives(directives: &Directives, before: &str, after: &str, out: &mut String) -> fmt::Result {
    if directives.inaccessible {
        write!(out, "{before}@inaccessible{after}")?;
    }

    for tag in &directives.tags {
        write!(out, "{before}@tag(name: ")?;
        write_string_literal(tag, out)?;
        write!(out, "){after}")?;
    }

    if let Some(deprecated) = &directives.deprecated {
        out.push_str(before);
        write_deprecated(deprecated, out)?;
        out.push_str(after);
    }

    Ok(())
}
