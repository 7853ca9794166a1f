use super::display_utils::*;
use crate::{Directives, FederatedGraph, InputValueDefinition, TypeDefinition, TypeKind};
use itertools::Itertools;
use std::fmt::{self, Write};

/// Render the schema exposed to clients: the federated graph without its inaccessible elements
/// and without any federation directive. `@deprecated` is kept.
pub fn render_api_sdl(graph: &FederatedGraph) -> Result<String, fmt::Error> {
    let mut sections = Vec::new();

    let has_renamed_roots = graph
        .root_operation_types
        .iter()
        .any(|(operation, name)| !is_default_root_name(operation, name));

    if has_renamed_roots {
        let mut schema = String::from("schema {\n");

        for (operation, name) in graph.root_operation_types.iter() {
            if is_accessible_type(graph, name) {
                writeln!(schema, "{INDENT}{operation}: {name}")?;
            }
        }

        schema.push_str("}\n");
        sections.push(schema);
    }

    for definition in graph.types.values() {
        if definition.is_inaccessible() {
            continue;
        }

        let mut section = String::new();
        write_type_definition(graph, definition, &mut section)?;
        sections.push(section);
    }

    Ok(sections.join("\n"))
}

fn is_default_root_name(operation: &str, name: &str) -> bool {
    let mut chars = operation.chars();
    chars
        .next()
        .is_some_and(|first| name.starts_with(first.to_ascii_uppercase()) && name[1..] == *chars.as_str())
}

fn is_accessible_type(graph: &FederatedGraph, name: &str) -> bool {
    !graph
        .type_definition(name)
        .is_some_and(|definition| definition.is_inaccessible())
}

fn write_type_definition(graph: &FederatedGraph, definition: &TypeDefinition, out: &mut String) -> fmt::Result {
    write_description(definition.description.as_deref(), "", out)?;

    match &definition.kind {
        TypeKind::Object(composite) | TypeKind::Interface(composite) => {
            let keyword = if matches!(definition.kind, TypeKind::Object(_)) {
                "type"
            } else {
                "interface"
            };

            write!(out, "{keyword} {}", definition.name)?;

            let interfaces = composite
                .implements_interfaces
                .iter()
                .filter(|interface| is_accessible_type(graph, interface))
                .join(" & ");

            if !interfaces.is_empty() {
                write!(out, " implements {interfaces}")?;
            }

            write_directives(&definition.directives, out)?;
            out.push_str(" {\n");

            for field in composite.fields.values().filter(|field| !field.is_inaccessible()) {
                write_description(field.description.as_deref(), INDENT, out)?;
                write!(out, "{INDENT}{}", field.name)?;

                let arguments = field
                    .arguments
                    .values()
                    .filter(|argument| !argument.directives.inaccessible)
                    .collect::<Vec<_>>();

                if !arguments.is_empty() {
                    out.push('(');

                    for (idx, argument) in arguments.into_iter().enumerate() {
                        if idx > 0 {
                            out.push_str(", ");
                        }

                        write_input_value_definition(argument, out)?;
                    }

                    out.push(')');
                }

                write!(out, ": {}", field.r#type)?;
                write_directives(&field.directives, out)?;
                out.push('\n');
            }

            out.push_str("}\n");
        }
        TypeKind::Union(union) => {
            write!(out, "union {}", definition.name)?;
            write_directives(&definition.directives, out)?;

            let members = union
                .members
                .keys()
                .filter(|member| is_accessible_type(graph, member))
                .join(" | ");

            writeln!(out, " = {members}")?;
        }
        TypeKind::InputObject(input_object) => {
            write!(out, "input {}", definition.name)?;
            write_directives(&definition.directives, out)?;
            out.push_str(" {\n");

            for field in input_object.fields.values().filter(|field| !field.directives.inaccessible) {
                write_description(field.description.as_deref(), INDENT, out)?;
                out.push_str(INDENT);
                write_input_value_definition(field, out)?;
                out.push('\n');
            }

            out.push_str("}\n");
        }
        TypeKind::Enum(r#enum) => {
            write!(out, "enum {}", definition.name)?;
            write_directives(&definition.directives, out)?;
            out.push_str(" {\n");

            for value in r#enum.values.values().filter(|value| !value.directives.inaccessible) {
                write_description(value.description.as_deref(), INDENT, out)?;
                write!(out, "{INDENT}{}", value.name)?;
                write_directives(&value.directives, out)?;
                out.push('\n');
            }

            out.push_str("}\n");
        }
        TypeKind::Scalar => {
            write!(out, "scalar {}", definition.name)?;
            write_directives(&definition.directives, out)?;
            out.push('\n');
        }
    }

    Ok(())
}

fn write_input_value_definition(definition: &InputValueDefinition, out: &mut String) -> fmt::Result {
    write!(out, "{}: {}", definition.name, definition.r#type)?;

    if let Some(default) = &definition.default {
        write!(out, " = {default}")?;
    }

    write_directives(&definition.directives, out)
}

fn write_directives(directives: &Directives, out: &mut String) -> fmt::Result {
    if let Some(deprecated) = &directives.deprecated {
        out.push(' ');
        write_deprecated(deprecated, out)?;
    }

    Ok(())
}
