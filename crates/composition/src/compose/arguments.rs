use super::*;
use crate::subgraphs::Argument;

/// Arguments present in only some of the definitions are dropped, unless they are required
/// somewhere.
pub(super) fn merge_arguments(
    ctx: &mut ComposeContext<'_>,
    field_coordinate: &str,
    fields: &[FieldWalker<'_>],
) -> IndexMap<String, federated::InputValueDefinition> {
    let mut groups: IndexMap<StringId, Vec<(FieldWalker<'_>, &Argument)>> = IndexMap::new();

    for field in fields {
        for argument in field.arguments() {
            groups.entry(argument.name).or_default().push((*field, argument));
        }
    }

    let mut arguments = IndexMap::new();

    for (name, present) in groups {
        let coordinate = format!("{field_coordinate}({}:)", ctx.subgraphs.walk(name).as_str());

        if let Some(argument) = merge_argument(ctx, fields, &present, &coordinate) {
            arguments.insert(argument.name.clone(), argument);
        }
    }

    arguments
}

fn merge_argument(
    ctx: &mut ComposeContext<'_>,
    fields: &[FieldWalker<'_>],
    present: &[(FieldWalker<'_>, &Argument)],
    coordinate: &str,
) -> Option<federated::InputValueDefinition> {
    let subgraphs = ctx.subgraphs;
    let (first_field, first) = present.first().copied()?;

    if present.len() < fields.len() {
        let missing_in: Vec<FieldWalker<'_>> = fields
            .iter()
            .copied()
            .filter(|field| !present.iter().any(|(present_field, _)| present_field.id == field.id))
            .collect();
        let missing_subgraphs = || describe_subgraphs(missing_in.iter().map(|field| field.subgraph().name().as_str()));

        if let Some((field, argument)) = present.iter().find(|(_, argument)| argument.is_required()) {
            let message = format!(
                "Argument \"{coordinate}\" is required in {} but is missing in {}",
                describe_subgraphs([field.subgraph().name().as_str()]),
                missing_subgraphs(),
            );

            ctx.push_error(DiagnosticCode::RequiredArgumentMissing, message)
                .at(field.argument_location(argument))
                .at_all(missing_in.iter().map(|field| field.location()));
        } else {
            let message = format!(
                "Optional argument \"{coordinate}\" will not be included in the supergraph as it does not appear in all \
                 subgraphs: it is defined in {} but not in {}",
                describe_subgraphs(present.iter().map(|(field, _)| field.subgraph().name().as_str())),
                missing_subgraphs(),
            );

            ctx.push_warning(DiagnosticCode::InconsistentArgumentPresence, message)
                .at_all(present.iter().map(|(field, argument)| field.argument_location(argument)));
            tracing::trace!(argument = coordinate, "dropping argument missing from some subgraphs");
        }

        return None;
    }

    if let Some((other_field, other)) = present
        .iter()
        .find(|(_, argument)| !argument.r#type.has_same_core(first.r#type))
    {
        let message = format!(
            "Type of argument \"{coordinate}\" is incompatible across subgraphs: it has type \"{}\" in subgraph \"{}\" \
             but type \"{}\" in subgraph \"{}\"",
            subgraphs.display_field_type(first.r#type),
            first_field.subgraph().name().as_str(),
            subgraphs.display_field_type(other.r#type),
            other_field.subgraph().name().as_str(),
        );

        ctx.push_error(DiagnosticCode::FieldArgumentTypeMismatch, message)
            .at(first_field.argument_location(first))
            .at(other_field.argument_location(other));
        return None;
    }

    if let Some((other_field, other)) = present.iter().find(|(_, argument)| argument.default != first.default) {
        let render_default = |argument: &Argument| match argument.default {
            Some(default) => format!("default value {}", subgraphs.walk(default).as_str()),
            None => String::from("no default value"),
        };

        let message = format!(
            "Argument \"{coordinate}\" has incompatible default values across subgraphs: it has {} in subgraph \"{}\" \
             but {} in subgraph \"{}\"",
            render_default(first),
            first_field.subgraph().name().as_str(),
            render_default(other),
            other_field.subgraph().name().as_str(),
        );

        ctx.push_error(DiagnosticCode::FieldArgumentDefaultMismatch, message)
            .at(first_field.argument_location(first))
            .at(other_field.argument_location(other));
    }

    let wrapping = present
        .iter()
        .map(|(_, argument)| argument.r#type.wrapping)
        .reduce(|merged, wrapping| merged.least_restrictive(wrapping).unwrap_or(merged))
        .unwrap_or(first.r#type.wrapping);

    Some(federated::InputValueDefinition {
        name: subgraphs.walk(first.name).as_str().to_owned(),
        description: present
            .iter()
            .find_map(|(_, argument)| argument.description)
            .map(|description| subgraphs.walk(description).as_str().to_owned()),
        r#type: federated::Type {
            name: subgraphs.walk(first.r#type.name).as_str().to_owned(),
            wrapping,
        },
        default: first.default.map(|default| subgraphs.walk(default).as_str().to_owned()),
        directives: merge_directives(present.iter().map(|(_, argument)| subgraphs.walk(argument.directives))),
        subgraph_ids: Vec::new(),
    })
}
